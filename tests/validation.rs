#![cfg(feature = "json")]

use indoc::indoc;
use pm1::{
  ast::*,
  describe, parse,
  token::{Keyword, Numeric},
  validate,
  validator::{validate_json_from_str, Error, JSONValidator, PathSegment},
  ValidatorOptions,
};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn validate_range_at_root() {
  let definition = parse("int<200,20000>").unwrap();
  let outcome = validate(&definition, &json!(50));

  assert!(!outcome.success);
  assert!(outcome.path.is_empty());
  assert_eq!(outcome.declaration, &definition);
  assert_eq!(
    outcome.error_message().unwrap(),
    "value at / does not satisfy int<200,20000>"
  );

  assert!(validate(&definition, &json!(200)).success);
  assert!(validate(&definition, &json!(20000)).success);
}

#[test]
fn validate_nested_object_path() {
  let definition = Definition::Object(Object {
    members: vec![
      Member::new("id", false, Keyword::Int.into()),
      Member::new(
        "plan",
        false,
        Object {
          members: vec![Member::new(
            "space",
            false,
            Range {
              keyword: Keyword::Int,
              minimum: Some(Numeric::INT(1)),
              maximum: None,
            }
            .into(),
          )],
        }
        .into(),
      ),
    ],
  });

  let outcome = validate(&definition, &json!({ "id": 1, "plan": { "space": -1 } }));

  assert!(!outcome.success);
  assert_eq!(
    outcome.path,
    vec![PathSegment::from("plan"), PathSegment::from("space")]
  );
  assert_eq!(describe(outcome.declaration), "int<1>");

  let outcome = validate(&definition, &json!({ "id": 1, "plan": { "space": 1 } }));
  assert!(outcome.success);
  assert!(outcome.path.is_empty());
  assert_eq!(outcome.declaration, &definition);
}

#[test]
fn validate_array_of_objects_path() {
  let definition = parse("[{ id: int }]").unwrap();
  let outcome = validate(&definition, &json!([{ "id": 1 }, { "id": "x" }]));

  assert!(!outcome.success);
  assert_eq!(
    outcome.path,
    vec![PathSegment::Index(1), PathSegment::Name("id".to_string())]
  );
  assert_eq!(
    outcome.error_message().unwrap(),
    "value at /1/id does not satisfy int"
  );
}

#[test]
fn validate_dates() {
  let date = Definition::Primitive(Keyword::Date);

  for valid in ["2020-02-06", "2020-02-29", "1999-12-31", "0001-01-01"].iter() {
    assert!(validate(&date, &json!(valid)).success, "{}", valid);
  }

  for invalid in ["2020-04-31", "1990-02-30", "2020-13-30", "20-02-06"].iter() {
    assert!(!validate(&date, &json!(invalid)).success, "{}", invalid);
  }

  assert!(!validate(&date, &json!(20200206)).success);
}

#[test]
fn validate_rejects_signed_years_and_leap_seconds() {
  let date = Definition::Primitive(Keyword::Date);
  let datetime = Definition::Primitive(Keyword::DateTime);
  let time = Definition::Primitive(Keyword::Time);

  assert!(!validate(&date, &json!("-0001-01-01")).success);
  assert!(!validate(&time, &json!("23:59:60")).success);
  assert!(!validate(&datetime, &json!("2020-02-06 23:59:60")).success);
  assert!(!validate(&datetime, &json!("2016-12-31T23:59:60Z")).success);

  assert!(validate(&time, &json!("23:59:59")).success);
  assert!(validate(&datetime, &json!("2020-02-06 23:59:59")).success);
}

#[test]
fn validate_datetimes_and_times() {
  let datetime = Definition::Primitive(Keyword::DateTime);
  assert!(validate(&datetime, &json!("2020-02-06 08:30:00")).success);
  assert!(validate(&datetime, &json!("2020-02-06T08:30:00+01:00")).success);
  assert!(validate(&datetime, &json!("2020-02-06T08:30:00Z")).success);
  assert!(!validate(&datetime, &json!("2020-02-31 08:30:00")).success);

  let time = Definition::Primitive(Keyword::Time);
  assert!(validate(&time, &json!("08:30:00")).success);
  assert!(!validate(&time, &json!("8:30")).success);
}

#[test]
fn validate_document() {
  let definition = parse(indoc!(
    r#"
      {
        id: int<1>,
        openid: /^[\da-f]{8}$/i,
        name: string<1,32>,
        balance?: double<0.0>,
        plan: {
          space: int<1>,
          private_repos: int<0>,
        },
        state: (active = 1, closed = 0),
        tags?: [string],
        created: date,
      }
    "#
  ))
  .unwrap();

  let mut document = json!({
    "id": 42,
    "openid": "DEADbeef",
    "name": "octo",
    "balance": null,
    "plan": { "space": 100, "private_repos": 0 },
    "state": 1,
    "created": "2020-02-06",
    "unknown": [1, 2, 3]
  });

  assert!(validate(&definition, &document).success);

  document["tags"] = json!(["a", "b", 3]);
  assert_eq!(
    validate(&definition, &document).error_message().unwrap(),
    "value at /tags/2 does not satisfy string"
  );

  document["tags"] = json!([]);
  document["state"] = json!(2);
  assert_eq!(
    validate(&definition, &document).error_message().unwrap(),
    "value at /state does not satisfy (1,0)"
  );

  document["state"] = json!(0);
  document.as_object_mut().unwrap().remove("plan");
  assert_eq!(
    validate(&definition, &document).error_message().unwrap(),
    "value at /plan does not satisfy { space: int<1>, private_repos: int<0> }"
  );
}

#[test]
fn validate_is_repeatable() {
  let definition = parse("{ a: [(1,2)], b?: /x/ }").unwrap();
  let copy = definition.clone();
  let value = json!({ "a": [1, 2, 3], "b": "y" });

  let first = validate(&definition, &value);
  let second = validate(&definition, &value);

  assert_eq!(first, second);
  assert_eq!(first.path, vec![PathSegment::from("a"), PathSegment::Index(2)]);
  assert_eq!(describe(&definition), describe(&definition));
  assert_eq!(definition, copy);
}

#[test]
fn validate_with_trimmed_string_length() {
  let definition = parse("{ code: string<3,3> }").unwrap();
  let value = json!({ "code": " abc " });

  assert!(!validate(&definition, &value).success);
  assert!(
    JSONValidator::with_options(&definition, ValidatorOptions::new().trim_string_length(true))
      .validate(&value)
      .success
  );
}

#[test]
fn validate_from_strings() {
  assert!(validate_json_from_str("{ id: int }", r#"{ "id": 1 }"#).is_ok());

  match validate_json_from_str("{ id: int }", r#"{ "id": 1.5 }"#) {
    Err(Error::Validation(e)) => {
      assert_eq!(e.to_string(), "value at /id does not satisfy int");
      assert_eq!(e.declaration, Definition::Primitive(Keyword::Int));
    }
    other => panic!("expected validation error, got {:?}", other),
  }
}
