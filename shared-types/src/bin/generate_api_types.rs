use shared_types::*;
use std::fs;
use std::path::PathBuf;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for the tracker data API
    let mut types = Vec::new();

    // Job record types
    types.push(clean_type(JobId::export_to_string()?));
    types.push(clean_type(JobPriority::export_to_string()?));
    types.push(clean_type(JobType::export_to_string()?));
    types.push(clean_type(JobRecord::export_to_string()?));
    types.push(clean_type(JobDraft::export_to_string()?));
    types.push(clean_type(JobPatch::export_to_string()?));

    // Validation types
    types.push(clean_type(FieldError::export_to_string()?));
    types.push(clean_type(ValidationErrors::export_to_string()?));

    // Filter types
    types.push(clean_type(DateRange::export_to_string()?));
    types.push(clean_type(SortKey::export_to_string()?));
    types.push(clean_type(SortOrder::export_to_string()?));
    types.push(clean_type(FilterCriteria::export_to_string()?));

    // Dashboard types
    types.push(clean_type(Stats::export_to_string()?));
    types.push(clean_type(StatusDistribution::export_to_string()?));
    types.push(clean_type(Dashboard::export_to_string()?));

    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("bindings"));
    fs::create_dir_all(&output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    // Everything lands in one file, so cross-type imports are dropped
    let filtered: Vec<&str> = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}
