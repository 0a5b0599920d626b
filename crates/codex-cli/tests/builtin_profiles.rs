//! Every built-in profile run end to end over a file in its release layout.

use std::fs;

use codex_cli::pipeline::{JobOutcome, JobSpec, run_job};
use codex_model::ValidationMode;
use codex_normalization::NullReporter;
use codex_standards::CodeSystemRegistry;
use tempfile::{TempDir, tempdir};

struct Run {
    outcome: JobOutcome,
    csv: String,
    _dir: TempDir,
}

impl Run {
    fn codes(&self) -> Vec<&str> {
        self.outcome
            .table
            .records
            .iter()
            .map(|record| record.code.as_str())
            .collect()
    }

    fn descriptions(&self) -> Vec<&str> {
        self.outcome
            .table
            .records
            .iter()
            .map(|record| record.description.as_str())
            .collect()
    }
}

fn run_profile(profile: &str, file_name: &str, contents: &str, mode: ValidationMode) -> Run {
    let dir = tempdir().unwrap();
    let input = dir.path().join(file_name);
    fs::write(&input, contents).unwrap();
    let registry = CodeSystemRegistry::builtin().unwrap();
    let spec = JobSpec::new(profile, &input, dir.path().join("out").join(profile)).with_mode(mode);
    let outcome = run_job(&registry, &spec, &NullReporter).unwrap();
    let csv = fs::read_to_string(&outcome.persisted.path).unwrap();
    Run {
        outcome,
        csv,
        _dir: dir,
    }
}

fn order_line(order: &str, code: &str, flag: &str, short: &str, long: &str) -> String {
    format!("{order:0>5} {code:<7} {flag} {short:<60} {long}\n")
}

#[test]
fn hcpcs_pipe_file() {
    let run = run_profile(
        "hcpcs",
        "HCPC2025.txt",
        "code|description\n\
         a0021 | Ambulance service, outside state per mile \n\
         J3490|Unclassified drugs\n\
         9999|Not a code\n",
        ValidationMode::Strict,
    );
    assert_eq!(run.codes(), ["A0021", "J3490"]);
    assert_eq!(run.outcome.table.stats.invalid_dropped, 1);
}

#[test]
fn hcpcs_anweb_csv() {
    let run = run_profile(
        "hcpcs-anweb",
        "HCPC2025_JAN_ANWEB.csv",
        "HCPC,LONG DESCRIPTION,SHORT DESCRIPTION\n\
         A0021,\"Ambulance service, outside state per mile, transport\",Outside state ambulance serv\n\
         A0080,\"Non-emergency transportation, per mile\",Noninterest escort in non er\n",
        ValidationMode::Strict,
    );
    assert_eq!(run.codes(), ["A0021", "A0080"]);
    assert_eq!(
        run.descriptions()[0],
        "Ambulance service, outside state per mile, transport"
    );
}

#[test]
fn icd10cm_pipe_file() {
    let run = run_profile(
        "icd10cm",
        "icd10cm.txt",
        "code|description\nz99.8|Dependence on other enabling machines and devices\nU07.1|COVID-19\n",
        ValidationMode::Strict,
    );
    assert_eq!(run.codes(), ["Z99.8"]);
}

#[test]
fn icd10cm_order_file_gets_decimal_points() {
    let contents = [
        order_line("1", "A00", "0", "Cholera", "Cholera"),
        order_line(
            "2",
            "A000",
            "1",
            "Cholera due to Vibrio cholerae 01, biovar cholerae",
            "Cholera due to Vibrio cholerae 01, biovar cholerae",
        ),
        order_line(
            "3",
            "A001",
            "1",
            "Cholera due to Vibrio cholerae 01, biovar eltor",
            "Cholera due to Vibrio cholerae 01, biovar eltor",
        ),
        order_line(
            "4",
            "S72001A",
            "1",
            "Fracture of unsp part of neck of right femur, init",
            "Fracture of unspecified part of neck of right femur, initial encounter for closed fracture",
        ),
    ]
    .concat();
    let run = run_profile(
        "icd10cm-order",
        "icd10cm_order_2025.txt",
        &contents,
        ValidationMode::Strict,
    );
    assert_eq!(run.codes(), ["A00", "A00.0", "A00.1", "S72.001A"]);
    assert_eq!(run.outcome.table.stats.rows_read, 4);
    assert_eq!(run.outcome.table.stats.invalid_dropped, 0);
    assert_eq!(
        run.descriptions()[3],
        "Fracture of unspecified part of neck of right femur, initial encounter for closed fracture"
    );
}

#[test]
fn icd10who_semicolon_file() {
    let run = run_profile(
        "icd10who",
        "icd102019syst_kodes.txt",
        "3;T;X;01;A00.0;A00.0;A00.0;A00;Cholera due to Vibrio cholerae 01, biovar cholerae\n\
         3;T;X;01;A00.1;A00.1;A00.1;A00;Cholera due to Vibrio cholerae 01, biovar eltor\n\
         3;T;X;22;U07.1;U07.1;U07.1;U07;COVID-19, virus identified\n",
        ValidationMode::Audit,
    );
    assert_eq!(run.codes(), ["A00.0", "A00.1", "U07.1"]);
    assert_eq!(run.outcome.table.stats.invalid_flagged, 1);
    assert!(run.csv.starts_with("code,description,is_valid\n"));
}

#[test]
fn icd10who_claml_document() {
    let run = run_profile(
        "icd10who-claml",
        "icd102019en.xml",
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ClaML version="2.0.0">
  <Title name="ICD-10" version="2019">International Classification of Diseases</Title>
  <Class code="I" kind="chapter">
    <Rubric kind="preferred"><Label>Certain infectious and parasitic diseases</Label></Rubric>
  </Class>
  <Class code="A00" kind="category">
    <Rubric kind="preferred"><Label xml:lang="en">Cholera</Label></Rubric>
  </Class>
  <Class code="A00.9" kind="category">
    <Rubric kind="preferred"><Label xml:lang="en">Cholera, unspecified</Label></Rubric>
  </Class>
</ClaML>
"#,
        ValidationMode::Strict,
    );
    assert_eq!(run.codes(), ["A00", "A00.9"]);
    assert_eq!(run.descriptions(), ["Cholera", "Cholera, unspecified"]);
}

#[test]
fn loinc_table_export() {
    let run = run_profile(
        "loinc",
        "Loinc.csv",
        "\"LOINC_NUM\",\"COMPONENT\",\"PROPERTY\",\"SYSTEM\",\"LONG_COMMON_NAME\"\n\
         \"2345-7\",\"Glucose\",\"MCnc\",\"Ser/Plas\",\"Glucose [Mass/volume] in Serum or Plasma\"\n\
         \"2951-2\",\"Sodium\",\"SCnc\",\"Ser/Plas\",\"Sodium [Moles/volume] in Serum or Plasma\"\n\
         \"2345-7\",\"Glucose\",\"MCnc\",\"Ser/Plas\",\"Glucose [Mass/volume] in Serum or Plasma\"\n",
        ValidationMode::Strict,
    );
    assert_eq!(run.codes(), ["2345-7", "2951-2"]);
    assert_eq!(run.descriptions(), ["Glucose", "Sodium"]);
    assert_eq!(run.outcome.table.stats.duplicates_removed, 1);
}

#[test]
fn npi_extract_names_organizations_and_individuals() {
    let run = run_profile(
        "npi",
        "npidata_pfile.csv",
        "\"NPI\",\"Entity Type Code\",\"Replacement NPI\",\"Provider Organization Name (Legal Business Name)\",\"Provider Last Name (Legal Name)\",\"Provider First Name\"\n\
         \"1245319599\",\"2\",\"\",\"GENERAL CLINIC, LLC\",\"\",\"\"\n\
         \"1679576722\",\"1\",\"\",\"\",\"WIEBE\",\"DAVID\"\n\
         \"123456789\",\"1\",\"\",\"\",\"SHORT\",\"NPI\"\n\
         \"1588667638\",\"1\"\n",
        ValidationMode::Strict,
    );
    assert_eq!(run.codes(), ["1245319599", "1679576722"]);
    assert_eq!(run.descriptions(), ["GENERAL CLINIC, LLC", "DAVID WIEBE"]);
    assert_eq!(run.outcome.table.stats.malformed_skipped, 1);
    assert_eq!(run.outcome.table.stats.invalid_dropped, 1);
}

#[test]
fn rxnorm_csv_extract() {
    let run = run_profile(
        "rxnorm",
        "rxnorm.csv",
        "RXCUI,STR\n161,Acetaminophen\n198440,\"Acetaminophen 500 MG Oral Tablet\"\nRX1,Bad\n",
        ValidationMode::Strict,
    );
    assert_eq!(run.codes(), ["161", "198440"]);
}

#[test]
fn rxnorm_rrf_conso_file() {
    let run = run_profile(
        "rxnorm-rrf",
        "RXNCONSO.RRF",
        "38|ENG||||||829|829|38||RXNORM|BN|38|ParaGard|||N|4096|\n\
         161|ENG||||||1209898|1209898|161||RXNORM|IN|161|Acetaminophen|||N|4096|\n\
         1000001|ENG||||||5448154|5448154|1000001||RXNORM|SCD|1000001|amlodipine 5 MG / hydrochlorothiazide 12.5 MG / olmesartan medoxomil 20 MG Oral Tablet \"Pack\"|||N|4096|\n\
         truncated|line\n",
        ValidationMode::Strict,
    );
    assert_eq!(run.codes(), ["38", "161", "1000001"]);
    assert_eq!(
        run.descriptions()[2],
        "amlodipine 5 MG / hydrochlorothiazide 12.5 MG / olmesartan medoxomil 20 MG Oral Tablet \"Pack\""
    );
    assert_eq!(run.outcome.table.stats.malformed_skipped, 1);
}

#[test]
fn snomed_csv_honors_quoted_commas() {
    let run = run_profile(
        "snomed",
        "snomed.csv",
        "code,description\n\
         22298006,\"Myocardial infarction, acute\"\n\
         56265001,\"Heart disease\"\n\
         38341003,Hypertensive disorder\n",
        ValidationMode::Strict,
    );
    assert_eq!(run.codes(), ["22298006", "56265001", "38341003"]);
    assert_eq!(
        run.descriptions(),
        [
            "Myocardial infarction, acute",
            "Heart disease",
            "Hypertensive disorder"
        ]
    );
    assert!(run.csv.contains("22298006,\"Myocardial infarction, acute\","));
}

#[test]
fn snomed_rf2_description_file() {
    let run = run_profile(
        "snomed-rf2",
        "sct2_Description_Snapshot-en_INT.txt",
        "id\teffectiveTime\tactive\tmoduleId\tconceptId\tlanguageCode\ttypeId\tterm\tcaseSignificanceId\n\
         751689013\t20020131\t1\t900000000000207008\t22298006\ten\t900000000000013009\tHeart attack\t900000000000448009\n\
         1234567017\t20170731\t1\t900000000000207008\t709044004\ten\t900000000000013009\t5\" needle\t900000000000448009\n",
        ValidationMode::Strict,
    );
    assert_eq!(run.codes(), ["22298006", "709044004"]);
    assert_eq!(run.descriptions(), ["Heart attack", "5\" needle"]);
}
