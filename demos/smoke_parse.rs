use jt_core::{CoreOptions, ExplorerEngine, ParseWorker};

fn main() -> Result<(), String> {
  let path = std::env::args()
    .nth(1)
    .ok_or_else(|| "usage: cargo run --example smoke_parse -- <path-to-json>".to_string())?;

  let options = CoreOptions::default();
  let eng = ExplorerEngine::new(options.clone()).with_worker(ParseWorker::spawn(options));

  let session = eng.parse_file(&path).map_err(|e| e.to_string())?;
  println!("root kind={:?}", session.root().kind);
  println!("root preview={}", session.root().preview);
  for child in session.expand("root").iter() {
    println!("{}  {}", child.path, child.preview);
  }
  Ok(())
}
