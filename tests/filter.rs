#![cfg(feature = "cache")]

use pm1::{
  ast::Definition,
  error::MsgType,
  filter::Error,
  parse,
  token::Keyword,
  validator::PathSegment,
  Filter,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::{
  error::Error as StdError,
  fs::{self, File},
  sync::Arc,
  thread,
  time::{Duration, SystemTime},
};

type TestResult = Result<(), Box<dyn StdError>>;

#[test]
fn filter_validates_against_schema_file() -> TestResult {
  let dir = tempfile::tempdir()?;
  let schema = dir.path().join("account.pm1");
  fs::write(&schema, "{ id: int<1>, plan: { space: int<1000> } }")?;

  let filter = Filter::new(Some(dir.path().join("cache")));

  filter.filter(&schema, &json!({ "id": 1, "plan": { "space": 1000 } }))?;

  match filter.filter(&schema, &json!({ "id": 1, "plan": { "space": 10 } })) {
    Err(Error::Validation(e)) => {
      assert_eq!(e.reason, "value at /plan/space does not satisfy int<1000>");
      assert_eq!(
        e.path,
        vec![PathSegment::from("plan"), PathSegment::from("space")]
      );
      assert_eq!(e.declaration, parse("int<1000>")?);
    }
    other => panic!("expected validation error, got {:?}", other),
  }

  Ok(())
}

#[test]
fn resolve_reuses_disk_cache() -> TestResult {
  let dir = tempfile::tempdir()?;
  let cache_dir = dir.path().join("cache");
  let schema = dir.path().join("id.pm1");
  fs::write(&schema, "int")?;

  let definition = Filter::new(Some(cache_dir.clone())).resolve(&schema)?;
  assert_eq!(*definition, Definition::Primitive(Keyword::Int));

  // A fresh cache file wins over the source
  let filter = Filter::new(Some(cache_dir));
  let cache = filter.cache_path(&fs::canonicalize(&schema)?);
  fs::write(
    &cache,
    serde_json::to_string(&Definition::Primitive(Keyword::Bool))?,
  )?;

  assert_eq!(
    *filter.resolve(&schema)?,
    Definition::Primitive(Keyword::Bool)
  );

  Ok(())
}

#[test]
fn resolve_recompiles_modified_schema() -> TestResult {
  let dir = tempfile::tempdir()?;
  let schema = dir.path().join("id.pm1");
  fs::write(&schema, "int")?;

  let filter = Filter::new(Some(dir.path().join("cache")));
  let first = filter.resolve(&schema)?;
  assert!(Arc::ptr_eq(&first, &filter.resolve(&schema)?));

  fs::write(&schema, "[string]")?;
  File::options()
    .write(true)
    .open(&schema)?
    .set_modified(SystemTime::now() + Duration::from_secs(60))?;

  let second = filter.resolve(&schema)?;
  assert_eq!(*second, parse("[string]")?);
  assert_eq!(*first, Definition::Primitive(Keyword::Int));

  Ok(())
}

#[test]
fn resolve_discards_unreadable_cache() -> TestResult {
  let dir = tempfile::tempdir()?;
  let schema = dir.path().join("flag.pm1");
  fs::write(&schema, "bool")?;

  let filter = Filter::new(Some(dir.path().join("cache")));
  fs::create_dir_all(filter.cache_dir())?;
  fs::write(filter.cache_path(&fs::canonicalize(&schema)?), "{ not json")?;

  assert_eq!(*filter.resolve(&schema)?, Definition::Primitive(Keyword::Bool));

  Ok(())
}

#[test]
fn resolve_reports_errors() -> TestResult {
  let dir = tempfile::tempdir()?;
  let filter = Filter::new(Some(dir.path().join("cache")));

  match filter.resolve(dir.path().join("missing.pm1")) {
    Err(Error::Io { .. }) => {}
    other => panic!("expected I/O error, got {:?}", other),
  }

  let schema = dir.path().join("broken.pm1");
  fs::write(&schema, "{ id: integer }")?;

  match filter.resolve(&schema) {
    Err(Error::Syntax { source, .. }) => {
      assert_eq!(source.msg_type(), Some(MsgType::InvalidPrimitiveType));
      assert_eq!(source.offset(), 6);
    }
    other => panic!("expected syntax error, got {:?}", other),
  }

  Ok(())
}

#[test]
fn resolve_is_shared_across_threads() -> TestResult {
  let dir = tempfile::tempdir()?;
  let schema = dir.path().join("tags.pm1");
  fs::write(&schema, "[string]")?;

  let filter = Arc::new(Filter::new(Some(dir.path().join("cache"))));

  let handles = (0..4)
    .map(|_| {
      let filter = filter.clone();
      let schema = schema.clone();

      thread::spawn(move || filter.filter(&schema, &json!(["a", "b"])).is_ok())
    })
    .collect::<Vec<_>>();

  for handle in handles {
    assert!(handle.join().map_err(|_| "thread panicked")?);
  }

  Ok(())
}
