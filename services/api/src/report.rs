use campus_insights::error::AppError;
use campus_insights::records::analytics::Distribution;
use campus_insights::records::completion::views::ProgressSummary;
use campus_insights::records::dataset::DatasetError;
use campus_insights::records::{
    AggregateBundle, PersonRecord, ProgressReport, RawPersonRecord, StudentDataset, YearFilter,
};
use clap::Args;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct OverviewArgs {
    /// Student dataset to aggregate (.json array or .csv export)
    #[arg(long)]
    pub(crate) data: PathBuf,
    /// Academic year to filter on, or "all"
    #[arg(long, default_value = "all", value_parser = parse_year)]
    pub(crate) year: YearFilter,
    /// Print the overview as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ProgressArgs {
    /// Person bundle with `student`, `info` and `candidacy` sections
    #[arg(long)]
    pub(crate) data: PathBuf,
    /// Print the progress summary as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

fn parse_year(raw: &str) -> Result<YearFilter, String> {
    Ok(YearFilter::parse(raw))
}

pub(crate) fn run_overview(args: OverviewArgs) -> Result<(), AppError> {
    let dataset = StudentDataset::from_path(&args.data)?;
    let bundle = dataset.aggregate(&args.year);

    if args.json {
        print_json("Overview", &bundle);
    } else {
        for line in overview_lines(&bundle, &dataset.available_years()) {
            println!("{line}");
        }
    }
    Ok(())
}

pub(crate) fn run_progress(args: ProgressArgs) -> Result<(), AppError> {
    let file = File::open(&args.data).map_err(DatasetError::from)?;
    let raw: RawPersonRecord =
        serde_json::from_reader(BufReader::new(file)).map_err(DatasetError::from)?;
    let person = PersonRecord::from_raw(&raw);
    let summary = ProgressReport::for_person(&person).summary();

    if args.json {
        print_json("Progress", &summary);
    } else {
        for line in progress_lines(&person, &summary) {
            println!("{line}");
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(what: &str, value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("{what} payload unavailable: {err}"),
    }
}

pub(crate) fn overview_lines(bundle: &AggregateBundle, years: &[String]) -> Vec<String> {
    let metrics = &bundle.key_metrics;
    let mut lines = vec![format!("Campus overview (year: {})", bundle.year_filter)];
    if !years.is_empty() {
        lines.push(format!("Available years: {}", years.join(", ")));
    }
    if bundle.is_empty() {
        lines.push("No student records match this selection.".to_string());
    }
    lines.push(format!(
        "- {} students | average GPA {:.2} | retention {}% | graduation {}%",
        metrics.total_enrollment, metrics.average_gpa, metrics.retention_rate, metrics.graduation_rate
    ));

    let sections: [(&str, &Distribution); 11] = [
        ("Enrollment by year (all years)", &bundle.enrollment_by_year),
        ("Gender", &bundle.gender),
        ("Programs", &bundle.programs),
        ("GPA bands", &bundle.gpa_bands),
        ("Domestic / international", &bundle.residency),
        ("Age bands", &bundle.age_bands),
        ("Departments", &bundle.departments),
        ("Class levels", &bundle.class_levels),
        ("Divisions", &bundle.divisions),
        ("Entrance terms", &bundle.terms),
        ("Top countries", &bundle.countries),
    ];
    for (title, distribution) in sections {
        if distribution.is_empty() {
            continue;
        }
        lines.push(format!("{title}:"));
        for entry in distribution.legend() {
            lines.push(format!("  - {}: {} ({:.1}%)", entry.key, entry.count, entry.share_pct));
        }
    }

    if !bundle.program_performance.is_empty() {
        lines.push("Program performance:".to_string());
        for program in &bundle.program_performance {
            lines.push(format!(
                "  - {}: GPA index {:.1} | retention {:.1}% | graduation {:.1}% | {} students",
                program.program,
                program.scaled_gpa,
                program.retention_pct,
                program.graduation_pct,
                program.students
            ));
        }
    }
    if !bundle.retention_by_year.is_empty() {
        lines.push("Retention by year (all years):".to_string());
        for year in &bundle.retention_by_year {
            lines.push(format!(
                "  - {}: {}% ({} of {})",
                year.year, year.rate, year.good_standing, year.total
            ));
        }
    }
    lines
}

pub(crate) fn progress_lines(person: &PersonRecord, summary: &ProgressSummary) -> Vec<String> {
    let name = person
        .display_name()
        .unwrap_or_else(|| "Unnamed student".to_string());
    let id = person.primary_id().unwrap_or_else(|| "-".to_string());
    let mut lines = vec![
        format!("{name} (ID {id})"),
        format!("Overall completion: {}%", summary.overall_percent),
    ];

    for category in &summary.categories {
        if !category.fetched {
            lines.push(format!("- {}: not available", category.category_label));
            continue;
        }
        lines.push(format!(
            "- {}: {}% ({}/{})",
            category.category_label, category.percent, category.filled_count, category.total_count
        ));
        if !category.missing.is_empty() {
            let missing: Vec<&str> = category.missing.iter().map(|field| field.label).collect();
            lines.push(format!("  missing: {}", missing.join(", ")));
        }
    }
    if summary.candidacy_records > 1 {
        lines.push(format!(
            "Candidacy scored on the first of {} records",
            summary.candidacy_records
        ));
    }
    lines
}
