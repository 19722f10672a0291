use anyhow::Result;
use serde_json::Value as JsonValue;
use tempfile::tempdir;

use retail_cleaner::app::CleanDatasetUseCase;
use retail_cleaner::config::Config;
use retail_cleaner::infra::{self, json_store};

const CARD_CSV: &str = "\
card_number,expiry_date,card_provider,date_payment_confirmed
??4971858637664481,09/26,Mastercard,2015 November 25
30060773296197,09/26,Bogus Card,2001-06-18
card_number,expiry_date,card_provider,date_payment_confirmed
4971858637664481,09/26,Mastercard,25-11-2015
213142929492281,10/23,JCB 15 digit,
";

#[tokio::test]
async fn test_csv_to_json_run_writes_output_and_report() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("cards.csv");
    let output = temp_dir.path().join("clean").join("cards.json");
    tokio::fs::write(&input, CARD_CSV).await?;

    let config = Config::default();
    let use_case = CleanDatasetUseCase::with_default_registry(
        infra::source_for_path(&input)?,
        infra::sink_for_path(&output, config.output.pretty_json)?,
        config,
    );

    let report = use_case.run("card").await?;
    let report_path = json_store::report_path_for(&output);
    json_store::write_report(&report_path, &report, true).await?;

    // Header row and empty date are missing, Bogus Card is off-vocabulary, one duplicate
    assert_eq!(report.input_rows, 5);
    assert_eq!(report.output_rows, 1);
    assert_eq!(report.rejected_count(), 4);

    let written: JsonValue = serde_json::from_str(&tokio::fs::read_to_string(&output).await?)?;
    let rows = written.as_array().expect("output is an array of rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["card_number"], "4971858637664481");
    assert_eq!(rows[0]["date_payment_confirmed"], "2015-11-25");

    let saved: JsonValue = serde_json::from_str(&tokio::fs::read_to_string(&report_path).await?)?;
    assert_eq!(saved["dataset"], "card");
    assert_eq!(saved["rejections"].as_array().map(|r| r.len()), Some(4));

    Ok(())
}

#[tokio::test]
async fn test_json_to_csv_run_for_store() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("stores.json");
    let output = temp_dir.path().join("stores.csv");
    tokio::fs::write(
        &input,
        r#"{
            "address": {"0": "Flat 72W\nSally isle", "1": "Hill Street\nLondon"},
            "continent": {"0": "eeEurope", "1": "Asiaa"},
            "lat": {"0": null, "1": null},
            "opening_date": {"0": "2006/10/04", "1": "2012-10-08"},
            "staff_numbers": {"0": "3n9", "1": "34"}
        }"#,
    )
    .await?;

    let use_case = CleanDatasetUseCase::with_default_registry(
        infra::source_for_path(&input)?,
        infra::sink_for_path(&output, false)?,
        Config::default(),
    );
    let report = use_case.run("store").await?;

    assert_eq!(report.output_rows, 1);
    let written = tokio::fs::read_to_string(&output).await?;
    assert_eq!(
        written,
        "address,continent,opening_date,staff_numbers\n\"Flat 72W, Sally isle\",Europe,2006-10-04,39\n"
    );

    Ok(())
}

#[tokio::test]
async fn test_unsupported_extension_is_rejected() {
    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("cards.xlsx");

    assert!(infra::source_for_path(&input).is_err());
}

#[tokio::test]
async fn test_missing_input_file_fails_the_run() {
    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("missing.json");
    let output = temp_dir.path().join("out.json");

    let use_case = CleanDatasetUseCase::with_default_registry(
        infra::source_for_path(&input).unwrap(),
        infra::sink_for_path(&output, true).unwrap(),
        Config::default(),
    );

    let err = use_case.run("user").await.unwrap_err();
    assert!(format!("{:#}", err).contains("missing.json"));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_output_keeps_source_column_order() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("orders.json");
    let output = temp_dir.path().join("orders.csv");
    tokio::fs::write(
        &input,
        r#"[
            {"product_quantity": 3, "level_0": 0, "date_uuid": "9476f17e", "card_number": "30060773296197"},
            {"product_quantity": 1, "level_0": 1, "date_uuid": "0423a395", "card_number": "4971858637664481"}
        ]"#,
    )
    .await?;

    let use_case = CleanDatasetUseCase::with_default_registry(
        infra::source_for_path(&input)?,
        infra::sink_for_path(&output, false)?,
        Config::default(),
    );
    use_case.run("orders").await?;

    let written = tokio::fs::read_to_string(&output).await?;
    assert_eq!(
        written,
        "product_quantity,date_uuid,card_number\n3,9476f17e,30060773296197\n1,0423a395,4971858637664481\n"
    );

    Ok(())
}
