use anyhow::Result;
use rust_xlsxwriter::{Format, Workbook};
use std::io::Read;
use std::path::Path;
use tech_hours::{EtlEngine, HoursError, HoursPipeline, LocalStorage, TomlConfig};
use tempfile::TempDir;

const HEADER: &str = "Technician,Work order for labor reporting,Labor reporting time (duration)";

fn write_input(dir: &Path, name: &str, content: &[u8]) -> String {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

fn config_for(roster: &[&str], inputs: &[String], output_path: &str, extra: &str) -> TomlConfig {
    let roster = roster
        .iter()
        .map(|t| format!("\"{}\"", t))
        .collect::<Vec<_>>()
        .join(", ");
    let inputs = inputs
        .iter()
        .map(|p| format!("'{}'", p))
        .collect::<Vec<_>>()
        .join(", ");

    let toml_content = format!(
        r#"
[roster]
technicians = [{roster}]

[input]
files = [{inputs}]

[load]
output_path = '{output_path}'
{extra}
"#
    );
    TomlConfig::from_toml_str(&toml_content).unwrap()
}

async fn run(config: TomlConfig, output_path: &str) -> tech_hours::Result<String> {
    let source = LocalStorage::new(String::new());
    let sink = LocalStorage::new(output_path.to_string());
    let pipeline = HoursPipeline::new(source, sink, config);
    EtlEngine::new(pipeline).run().await
}

#[tokio::test]
async fn test_end_to_end_bundle() -> Result<()> {
    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    let output_path = output_dir.path().to_str().unwrap().to_string();

    let week = write_input(
        input_dir.path(),
        "week1.csv",
        format!("{HEADER}\na,WO1,1:00:00\nA,WO1,0.5\nB,WO2,2.0\n").as_bytes(),
    );

    let config = config_for(
        &["B", "A", "C"],
        &[week],
        &output_path,
        "output_formats = [\"csv\", \"tsv\", \"xlsx\", \"json\"]\nbundle = true",
    );

    let result = run(config, &output_path).await?;
    assert!(result.ends_with("technician_report.zip"));

    let zip_data = std::fs::read(output_dir.path().join("technician_report.zip"))?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;

    let file_names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert!(file_names.contains(&"technician_summary.csv".to_string()));
    assert!(file_names.contains(&"technician_summary.tsv".to_string()));
    assert!(file_names.contains(&"technician_summary.xlsx".to_string()));
    assert!(file_names.contains(&"technician_hours_summary.json".to_string()));

    let mut csv_content = String::new();
    archive
        .by_name("technician_summary.csv")?
        .read_to_string(&mut csv_content)?;
    let lines: Vec<&str> = csv_content.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Technician,Work_Orders_Completed,Total_Hours_Worked",
            "A,1,13.00",
            "B,1,2.00",
            "C,0,0.00",
        ]
    );

    let mut json_content = String::new();
    archive
        .by_name("technician_hours_summary.json")?
        .read_to_string(&mut json_content)?;
    let report: serde_json::Value = serde_json::from_str(&json_content)?;
    assert_eq!(report["metrics"]["total_technicians"], 3);
    assert_eq!(report["chart"]["bars"][0]["technician"], "A");
    assert_eq!(report["chart"]["bars"][0]["color"], "#FF0000");
    assert_eq!(report["chart"]["target"]["label"], "Target (40h)");

    Ok(())
}

#[tokio::test]
async fn test_work_orders_are_distinct_across_files() -> Result<()> {
    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    let output_path = output_dir.path().to_str().unwrap().to_string();

    let first = write_input(
        input_dir.path(),
        "week1.csv",
        format!("{HEADER}\nROHIT,WO-7,4\nROHIT,WO-8,3\n").as_bytes(),
    );
    let second = write_input(
        input_dir.path(),
        "week2.tsv",
        "Technician\tWork order for labor reporting\tLabor reporting time (duration)\n\
         rohit\tWO-7\t2h 30m\n"
            .as_bytes(),
    );

    let config = config_for(
        &["ROHIT"],
        &[first, second],
        &output_path,
        "output_formats = [\"csv\"]",
    );

    let result = run(config, &output_path).await?;
    assert!(result.ends_with("technician_summary.csv"));

    let csv_content = std::fs::read_to_string(output_dir.path().join("technician_summary.csv"))?;
    assert!(csv_content.contains("ROHIT,2,9.50"));

    Ok(())
}

#[tokio::test]
async fn test_unsupported_input_is_skipped_not_fatal() -> Result<()> {
    use tech_hours::utils::validation::Validate;

    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    let output_path = output_dir.path().to_str().unwrap().to_string();

    let good = write_input(
        input_dir.path(),
        "good.csv",
        format!("{HEADER}\nA,WO1,8\n").as_bytes(),
    );
    let notes = write_input(input_dir.path(), "notes.txt", b"call the depot\n");

    let config = config_for(
        &["A"],
        &[good, notes],
        &output_path,
        "output_formats = [\"csv\", \"json\"]",
    );
    assert!(config.validate().is_ok());

    run(config, &output_path).await?;

    let csv_content = std::fs::read_to_string(output_dir.path().join("technician_summary.csv"))?;
    assert!(csv_content.contains("A,1,8.00"));

    let json_content =
        std::fs::read_to_string(output_dir.path().join("technician_hours_summary.json"))?;
    let report: serde_json::Value = serde_json::from_str(&json_content)?;
    let issues = report["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["dataset"], "notes.txt");

    Ok(())
}

#[tokio::test]
async fn test_skipped_datasets_leave_an_empty_batch() -> Result<()> {
    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    let output_path = output_dir.path().to_str().unwrap().to_string();

    let no_work_order = write_input(
        input_dir.path(),
        "partial.csv",
        b"Technician,Labor reporting time (duration)\nA,2.0\n",
    );
    let blank_durations = write_input(
        input_dir.path(),
        "blank.csv",
        format!("{HEADER}\nA,WO1,\n,WO2,1:00\n").as_bytes(),
    );

    let config = config_for(&["A"], &[no_work_order, blank_durations], &output_path, "");

    let err = run(config, &output_path).await.unwrap_err();
    assert!(matches!(err, HoursError::EmptyBatchError));
    assert_eq!(err.severity().exit_code(), 0);
    assert!(!output_dir.path().join("technician_summary.csv").exists());

    Ok(())
}

#[tokio::test]
async fn test_xlsx_input() -> Result<()> {
    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    let output_path = output_dir.path().to_str().unwrap().to_string();

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let duration_format = Format::new().set_num_format("[h]:mm");

    sheet.write_string(0, 0, "Technician")?;
    sheet.write_string(0, 1, "Work order for labor reporting")?;
    sheet.write_string(0, 2, "Labor reporting time (duration)")?;
    sheet.write_string(1, 0, "anish")?;
    sheet.write_string(1, 1, "WO-1")?;
    sheet.write_number_with_format(1, 2, 1.25, &duration_format)?;
    sheet.write_string(2, 0, "anish")?;
    sheet.write_string(2, 1, "WO-2")?;
    sheet.write_number(2, 2, 6.0)?;
    let xlsx = write_input(input_dir.path(), "week1.xlsx", &workbook.save_to_buffer()?);

    let config = config_for(
        &["ANISH", "PAUL_22"],
        &[xlsx],
        &output_path,
        "output_formats = [\"csv\", \"xlsx\"]",
    );

    run(config, &output_path).await?;

    let csv_content = std::fs::read_to_string(output_dir.path().join("technician_summary.csv"))?;
    let lines: Vec<&str> = csv_content.lines().collect();
    assert_eq!(lines[1], "ANISH,2,36.00");
    assert_eq!(lines[2], "PAUL_22,0,0.00");
    assert!(output_dir.path().join("technician_summary.xlsx").exists());

    Ok(())
}

#[cfg(feature = "cli")]
#[tokio::test]
async fn test_cli_config_keeps_roster_order() -> Result<()> {
    use clap::Parser;
    use tech_hours::CliConfig;

    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    let output_path = output_dir.path().to_str().unwrap().to_string();

    let week = write_input(
        input_dir.path(),
        "week1.csv",
        format!("{HEADER}\nzed,WO1,30\namy,WO2,45\n").as_bytes(),
    );

    let config = CliConfig::parse_from([
        "tech-hours",
        "--roster",
        "zed,Amy,bob",
        "--no-sort",
        "--formats",
        "csv",
        "--output-path",
        output_path.as_str(),
        week.as_str(),
    ]);

    let source = LocalStorage::new(String::new());
    let sink = LocalStorage::new(output_path.clone());
    let pipeline = HoursPipeline::new(source, sink, config);
    EtlEngine::new(pipeline).run().await?;

    let csv_content = std::fs::read_to_string(output_dir.path().join("technician_summary.csv"))?;
    let technicians: Vec<&str> = csv_content
        .lines()
        .skip(1)
        .map(|line| line.split(',').next().unwrap())
        .collect();
    assert_eq!(technicians, vec!["AMY", "BOB", "ZED"]);

    Ok(())
}

#[test]
fn test_blocking_run_with_tokio_test() {
    let output_dir = TempDir::new().unwrap();
    let output_path = output_dir.path().to_str().unwrap().to_string();
    let config = config_for(&["A"], &[], &output_path, "");

    let err = tokio_test::block_on(run(config, &output_path)).unwrap_err();
    assert!(matches!(err, HoursError::EmptyBatchError));
}
