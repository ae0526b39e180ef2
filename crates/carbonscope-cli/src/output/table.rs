use carbonscope_core::extraction::columns::Field;
use carbonscope_core::model::{CompanyEmissions, IndicatorSet};
use carbonscope_core::views::filter::IndicatorFilter;
use carbonscope_core::views::intensity::intensity_band;
use carbonscope_core::views::TrendReport;

use super::ParsedWorkbook;

pub fn print_parsed(parsed: &ParsedWorkbook) {
    println!("Columns:\n");
    for field in Field::ALL {
        match parsed.sheet.columns.get(field) {
            Some(m) => println!("  {:<10} \"{}\" (column {})", field.label(), m.header, m.index + 1),
            None => println!("  {:<10} -", field.label()),
        }
    }
    println!();

    println!(
        "Rows: {} read, {} without data, {} invalid, {} kept\n",
        parsed.sheet.rows_read,
        parsed.sheet.rows_dropped,
        parsed.invalid_records,
        parsed.records.len()
    );

    if parsed.records.is_empty() {
        return;
    }

    let name_width = parsed
        .records
        .iter()
        .map(|r| r.company.chars().count())
        .max()
        .unwrap_or(10)
        .max(7);
    let sector_width = parsed
        .records
        .iter()
        .map(|r| r.sector.chars().count())
        .max()
        .unwrap_or(10)
        .max(6);

    println!(
        "  {:<nw$}  {:<sw$}  {:>4}  {:>14}  {:>14}",
        "Company",
        "Sector",
        "Year",
        "Energy",
        "CO2",
        nw = name_width,
        sw = sector_width
    );
    for r in &parsed.records {
        println!(
            "  {:<nw$}  {:<sw$}  {:>4}  {:>14}  {:>14}",
            r.company,
            r.sector,
            r.year,
            r.energy_consumption.to_string(),
            r.co2_emissions.to_string(),
            nw = name_width,
            sw = sector_width
        );
    }
}

pub fn print_indicators(data: &IndicatorSet, rows_processed: usize, filter: &IndicatorFilter) {
    let mut scope = Vec::new();
    if let Some(year) = filter.year {
        scope.push(format!("year {year}"));
    }
    if let Some(ref sector) = filter.sector {
        scope.push(format!("sector {sector}"));
    }
    if scope.is_empty() {
        println!("=== Indicators ({rows_processed} records) ===\n");
    } else {
        println!("=== Indicators ({rows_processed} records, {}) ===\n", scope.join(", "));
    }

    println!("  Total emissions:            {} t CO2", data.total_emissions);
    println!("  Total energy consumption:   {} MWh", data.total_energy_consumption);
    println!("  Companies:                  {}", data.total_companies);
    println!("  Average energy per company: {} MWh", data.average_energy_per_company);
    println!("  Average carbon intensity:   {} t CO2/MWh", data.average_carbon_intensity);
    println!();

    if !data.emissions_by_year.is_empty() {
        println!("  By year:");
        for y in &data.emissions_by_year {
            println!(
                "    {}  {:>14} t  {:>14} MWh  {:>3} companies  {} t/MWh",
                y.year,
                y.total_emissions.to_string(),
                y.total_energy.to_string(),
                y.company_count,
                y.carbon_intensity
            );
        }
        println!();
    }

    if !data.emissions_by_sector.is_empty() {
        let width = data
            .emissions_by_sector
            .iter()
            .map(|s| s.sector.chars().count())
            .max()
            .unwrap_or(10);
        println!("  By sector:");
        for s in &data.emissions_by_sector {
            println!(
                "    {:<width$}  {:>14} t  {:>3} companies  {} t/MWh",
                s.sector,
                s.total_emissions.to_string(),
                s.company_count,
                s.carbon_intensity,
                width = width
            );
        }
        println!();
    }

    print_companies("Top emitters", &data.top_emitters, |c| format!("{} t", c.total_emissions));
    print_companies("Most efficient", &data.rankings.most_efficient, |c| {
        format!("{} t/MWh", c.carbon_intensity)
    });
    print_companies("Least efficient", &data.rankings.least_efficient, |c| {
        format!("{} t/MWh", c.carbon_intensity)
    });

    if !data.rankings.top_reducers.is_empty() {
        println!("  Top reducers:");
        for r in &data.rankings.top_reducers {
            println!(
                "    {}  -{}%  ({} -> {} t)",
                r.company, r.reduction_percent, r.previous_emissions, r.current_emissions
            );
        }
        println!();
    }

    if !data.forecast.is_empty() {
        println!("  Forecast (linear trend):");
        for p in &data.forecast {
            println!(
                "    {}  {:>14} t  confidence {}%",
                p.year,
                p.predicted_emissions.to_string(),
                p.confidence
            );
        }
        println!();
    }
}

fn print_companies(title: &str, companies: &[CompanyEmissions], value: impl Fn(&CompanyEmissions) -> String) {
    if companies.is_empty() {
        return;
    }
    let width = companies.iter().map(|c| c.company.chars().count()).max().unwrap_or(10);
    println!("  {title}:");
    for (i, c) in companies.iter().enumerate() {
        println!(
            "    {:>2}. {:<width$}  {:<12}  {}",
            i + 1,
            c.company,
            c.sector,
            value(c),
            width = width
        );
    }
    println!();
}

pub fn print_trends(report: &TrendReport) {
    println!("=== Emission trends ===\n");

    for change in &report.year_over_year {
        match (change.change, change.change_percent) {
            (Some(delta), Some(pct)) => {
                println!("  {}  {:>14} t  {:+} t ({:+}%)", change.year, change.emissions.to_string(), delta, pct)
            }
            (Some(delta), None) => println!("  {}  {:>14} t  {:+} t", change.year, change.emissions.to_string(), delta),
            _ => println!("  {}  {:>14} t", change.year, change.emissions.to_string()),
        }
    }
    println!();

    match &report.overall {
        Some(t) => {
            let pct = t
                .change_percent
                .map(|p| format!(" ({p:+}%)"))
                .unwrap_or_default();
            println!("  Overall over {} year(s): {}{} [{}]", t.years, t.change, pct, t.direction);
        }
        None => println!("  Overall: not enough years for a trend"),
    }
    println!();

    println!("=== Carbon intensity ===\n");
    println!("  Average: {} t CO2/MWh", report.average_carbon_intensity);
    if let Some(ref t) = report.intensity {
        println!(
            "  {} -> {}: {} -> {} ({}, {}%)",
            t.first_year, t.last_year, t.first_intensity, t.last_intensity, t.direction, t.percent
        );
    }
    for s in &report.sectors.ranked {
        println!(
            "    {:<20} {} t/MWh  {:?}",
            s.sector,
            s.carbon_intensity,
            intensity_band(s.carbon_intensity, report.average_carbon_intensity)
        );
    }
    if let (Some(best), Some(worst)) = (report.sectors.most_efficient(), report.sectors.least_efficient()) {
        println!("  Most efficient sector:  {}", best.sector);
        println!("  Least efficient sector: {}", worst.sector);
    }
    println!();

    if let Some(ref f) = report.forecast {
        println!("=== Forecast outlook ===\n");
        println!("  Last actual:    {} t ({})", f.last_actual_emissions, f.last_actual_year);
        println!("  Final forecast: {} t ({})", f.final_emissions, f.final_year);
        println!("  Direction:      {} {}%", f.direction, f.percent);
        println!("  Confidence:     {}% ({:?})", f.average_confidence, f.confidence_level);
    }
}
