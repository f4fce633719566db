//! Integration tests for loading decision tables from disk.

use cycleplan_core::{
    Config, CycleTemplate, Intensity, IntensityBand, Phase, TemplateError, TemplateOptions,
};
use indoc::indoc;
use tempfile::TempDir;

const SHORT_CYCLE: &str = indoc! {r#"
    Cycle_Day,Cycle_Phase,Energy_Level_1to5,Rest_Need_1to5,Expected_Symptoms
    1,Menstrual,2,4,"cramps"
    2,Menstrual,3,3,""
    3,Menstrual,3,3,""
    4,Follicular,4,2,""
    5,Follicular,4,2,""
    6,Ovulatory,5,1,""
    7,Luteal,4,2,""
    8,Luteal,3,3,"bloating"
"#};

#[test]
fn test_template_from_configured_path() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("short.csv");
    std::fs::write(&csv_path, SHORT_CYCLE).unwrap();

    let mut config = Config::default();
    config.template.path = Some(csv_path);
    config.template.cycle_length = 8;

    let template = config.load_template().unwrap();
    assert_eq!(template.cycle_length(), 8);

    // Day 3 is the third menstrual day; energy and rest are neutral.
    let day3 = template.decide_workout_intensity(3, "heavy").unwrap();
    assert_eq!(day3.base_intensity_pattern, IntensityBand::Light);
    assert_eq!(day3.recommended_intensity, Intensity::Light);

    // Both follicular days fall in the late-follicular window of a two-day run.
    let day4 = template.decide_workout_intensity(4, "heavy").unwrap();
    assert_eq!(day4.base_intensity_pattern, IntensityBand::Heavy);
    assert!(day4.ok_to_do_heavy);

    // Day 7 opens the luteal run.
    let day7 = template.decide_workout_intensity(15, "heavy").unwrap();
    assert_eq!(day7.cycle_day, 7);
    assert_eq!(day7.cycle_phase, Phase::Luteal);
    assert_eq!(day7.recommended_intensity, Intensity::Moderate);
}

#[test]
fn test_wrong_cycle_length_is_rejected_at_startup() {
    let err = CycleTemplate::from_reader(SHORT_CYCLE.as_bytes(), TemplateOptions::default())
        .unwrap_err();
    match err {
        TemplateError::MissingDays(days) => assert_eq!(days.first(), Some(&9)),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_builtin_table_reference_decision() {
    let template = CycleTemplate::builtin().unwrap();
    let decision = template.decide_workout_intensity(1, "heavy").unwrap();
    assert_eq!(decision.energy_level, 1);
    assert_eq!(decision.recommended_intensity, Intensity::Light);
    assert!(!decision.ok_to_do_heavy);
}
