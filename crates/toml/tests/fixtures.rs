use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use libtest_mimic::{Failed, Trial};

use streamtoml::diagnostic::{self, Style};
use streamtoml::Error;

#[derive(Clone, Copy, Default)]
enum Mode {
    /// Just fail the tests on mismatch
    #[default]
    Fail,
    /// Force overwrite the snapshots on mismatch
    Force,
}

fn main() {
    let mode = match std::env::var("SNAPSHOT").as_deref() {
        Ok("fail" | "") | Err(_) => Mode::Fail,
        Ok("force") => Mode::Force,
        Ok(m) => panic!("invalid mode `{m}`"),
    };

    let args = libtest_mimic::Arguments::from_args();

    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let mut tests = Vec::new();
    for path in toml_files(&fixtures.join("valid")) {
        let name = format!("valid::{}", file_stem(&path));
        tests.push(Trial::test(name, move || check_valid(&path)));
    }
    for path in toml_files(&fixtures.join("invalid")) {
        let name = format!("invalid::{}", file_stem(&path));
        tests.push(Trial::test(name, move || check_invalid(&path, mode)));
    }

    libtest_mimic::run(&args, tests).exit()
}

fn toml_files(dir: &Path) -> Vec<PathBuf> {
    let entries = std::fs::read_dir(dir)
        .unwrap_or_else(|e| panic!("cannot read fixture dir `{}`: {e}", dir.display()));
    let mut paths = entries
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|e| e == "toml"))
        .collect::<Vec<_>>();
    paths.sort();
    paths
}

fn file_stem(path: &Path) -> String {
    path.file_stem().unwrap().to_string_lossy().into_owned()
}

fn check_valid(path: &Path) -> Result<(), Failed> {
    let input = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let doc = streamtoml::from_str(&input).map_err(|e| match &e {
        Error::Parse(p) => diagnostic::render(p, &input, Style::Plain),
        _ => e.to_string(),
    })?;
    let actual_text = streamtoml::write::to_json_string(&doc);

    let expect_path = path.with_extension("json");
    let expect_text = std::fs::read_to_string(&expect_path)
        .map_err(|e| format!("Fixture `{}` not found:\n  {e}", expect_path.display()))?;

    let actual: serde_json::Value = serde_json::from_str(&actual_text)
        .map_err(|e| format!("written JSON is invalid: {e}\n{actual_text}"))?;
    let expected: serde_json::Value = serde_json::from_str(&expect_text)
        .map_err(|e| format!("fixture `{}` is invalid: {e}", expect_path.display()))?;

    if actual == expected {
        return Ok(());
    }

    let expected = serde_json::to_string_pretty(&expected).map_err(|e| e.to_string())?;
    let actual = serde_json::to_string_pretty(&actual).map_err(|e| e.to_string())?;
    let mut msg = String::new();
    section(&mut msg, "input", &input);
    let comp = pretty_assertions::StrComparison::new(expected.as_str(), actual.as_str());
    section(&mut msg, "  diff", &comp.to_string());
    Err(Failed::from(msg))
}

fn check_invalid(path: &Path, mode: Mode) -> Result<(), Failed> {
    let input = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let actual_text = match streamtoml::from_str(&input) {
        Ok(doc) => return Err(Failed::from(format!("Expected error but got:\n{doc:#?}"))),
        Err(Error::Parse(e)) => diagnostic::render(&e, &input, Style::Plain),
        Err(e) => return Err(Failed::from(format!("Expected parse error but got:\n{e}"))),
    };

    let expect_path = path.with_extension("stderr");
    let expect_text = match std::fs::read_to_string(&expect_path) {
        Ok(t) => t,
        Err(e) => {
            if let Mode::Force = mode {
                std::fs::write(&expect_path, &actual_text).map_err(|e| e.to_string())?;
                return Ok(());
            }

            let mut msg = format!("Fixture `{}` not found:\n  {e}\n", expect_path.display());
            section(&mut msg, " input ", &input);
            section(&mut msg, "message", &actual_text);
            return Err(Failed::from(msg));
        }
    };

    if expect_text == actual_text {
        return Ok(());
    }

    if let Mode::Force = mode {
        std::fs::write(&expect_path, &actual_text).map_err(|e| e.to_string())?;
        return Ok(());
    }

    let mut msg = String::new();
    section(&mut msg, " input  ", &input);
    section(&mut msg, "expected", &expect_text);
    section(&mut msg, " actual ", &actual_text);
    let comp = pretty_assertions::StrComparison::new(expect_text.as_str(), actual_text.as_str());
    section(&mut msg, "  diff  ", &comp.to_string());
    Err(Failed::from(msg))
}

fn section(msg: &mut String, title: &str, text: &str) {
    _ = writeln!(msg, "========================= {title} =========================");
    _ = write!(msg, "{text}");
    if !text.ends_with('\n') {
        msg.push('\n');
    }
}
