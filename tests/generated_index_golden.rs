use time::macros::{date, datetime};
use weekly_links::generate::{GenerateRequest, generate};

#[test]
fn generated_index_matches_golden() {
    let index = generate(&GenerateRequest {
        today: date!(2025 - 09 - 24),
        days: 3,
        source: "test_data".to_string(),
        generated_at: datetime!(2025-09-24 12:00:00 UTC),
    })
    .expect("generate index");

    let actual = serde_json::to_value(&index).expect("serialize index");
    let expected: serde_json::Value =
        serde_json::from_str(include_str!("golden/generated_index.json"))
            .expect("parse golden json");

    assert_eq!(actual, expected);
}
