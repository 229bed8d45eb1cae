#![allow(deprecated)] // assert_cmd::Command::cargo_bin is deprecated but replacement requires nightly

use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn srcpatch_cmd() -> assert_cmd::Command {
	assert_cmd::Command::cargo_bin("srcpatch").unwrap()
}

fn write_plan(dir: &Path, plan: &str) {
	fs::write(dir.join(".srcpatch.toml"), plan).unwrap();
}

const BUILDER_TSX: &str = r#"import React, { useState } from 'react';
import WebLLMModal from './WebLLMModal';
import { uploadMedia, formatFileSize } from '../utils/mediaUpload';

export default function Builder({ activeBento, handleExport }) {
  const [showWebLLMModal, setShowWebLLMModal] = useState(false);

  return (
    <div>
      <header>
            <div>
              <button
                type="button"
                aria-label="Deploy project"
                onClick={handleExport}
                className="bg-gray-900 text-white px-4 py-2 rounded-lg shadow-sm hover:bg-black transition-colors text-xs font-semibold flex items-center gap-2 focus:outline-none focus:ring-2 focus:ring-blue-500"
              >
                <Download size={16} />
                <span className="hidden sm:inline">Deploy</span>
              </button>
            </div>
      </header>

      {/* 5. ANALYTICS MODAL */}
      <AnalyticsModal />
    </div>
  );
}
"#;

// ============================================================================
// CLI flag tests
// ============================================================================

#[test]
fn test_help_flag() {
	srcpatch_cmd()
		.arg("--help")
		.assert()
		.success()
		.stdout(predicate::str::contains("reproducible text patches"));
}

#[test]
fn test_version_flag() {
	srcpatch_cmd()
		.arg("--version")
		.assert()
		.success()
		.stdout(predicate::str::contains("srcpatch"));
}

#[test]
fn test_no_plan_fails() {
	let temp_dir = tempfile::tempdir().unwrap();

	srcpatch_cmd()
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Plan file not found"));
}

#[test]
fn test_force_requires_init() {
	srcpatch_cmd()
		.arg("--force")
		.assert()
		.failure()
		.stderr(predicate::str::contains("--init"));
}

// ============================================================================
// --init tests
// ============================================================================

#[test]
fn test_init_creates_plan() {
	let temp_dir = tempfile::tempdir().unwrap();
	let plan_path = temp_dir.path().join(".srcpatch.toml");

	srcpatch_cmd()
		.arg("--init")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("Created .srcpatch.toml"));

	let content = fs::read_to_string(&plan_path).unwrap();
	assert!(content.contains("target = \"components/Builder.tsx\""));
	assert!(content.contains("[[rules]]"));
}

#[test]
fn test_init_fails_if_exists() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_plan(temp_dir.path(), "# existing");

	srcpatch_cmd()
		.arg("--init")
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_init_force_overwrites() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_plan(temp_dir.path(), "# existing");

	srcpatch_cmd()
		.args(["--init", "--force"])
		.current_dir(temp_dir.path())
		.assert()
		.success();

	let content = fs::read_to_string(temp_dir.path().join(".srcpatch.toml")).unwrap();
	assert!(content.contains("DeployModal"));
}

#[test]
fn test_init_template_patches_builder_idempotently() {
	let temp_dir = tempfile::tempdir().unwrap();
	let components = temp_dir.path().join("components");
	fs::create_dir(&components).unwrap();
	let builder = components.join("Builder.tsx");
	fs::write(&builder, BUILDER_TSX).unwrap();

	srcpatch_cmd()
		.arg("--init")
		.current_dir(temp_dir.path())
		.assert()
		.success();

	srcpatch_cmd()
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("4 of 4 rules applied"));

	let patched = fs::read_to_string(&builder).unwrap();
	assert!(patched.contains(
		"import WebLLMModal from './WebLLMModal';\nimport DeployModal from './DeployModal';\nimport { uploadMedia"
	));
	assert!(patched.contains(
		"useState(false);\n  const [showPublishModal, setShowPublishModal] = useState(false);"
	));
	let public = patched.find("aria-label=\"Make site public\"").unwrap();
	let deploy = patched.find("aria-label=\"Deploy project\"").unwrap();
	assert!(public < deploy);
	let mount = patched.find("{/* PUBLISH MODAL */}").unwrap();
	let analytics = patched.find("{/* 5. ANALYTICS MODAL */}").unwrap();
	assert!(mount < analytics);

	srcpatch_cmd()
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("Already up to date"))
		.stdout(predicate::str::contains("0 of 4 rules applied, 4 no-op"));

	assert_eq!(fs::read_to_string(&builder).unwrap(), patched);
}

// ============================================================================
// config subcommand tests
// ============================================================================

#[test]
fn test_config_validate_valid_plan() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_plan(
		temp_dir.path(),
		r#"
target = "app.ts"

[[rules]]
regex = 'import (\w+)'
replacement = "import $1"
"#,
	);

	srcpatch_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("valid"))
		.stdout(predicate::str::contains("1 rules"));
}

#[test]
fn test_config_validate_invalid_toml() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_plan(temp_dir.path(), "invalid toml [[[");

	srcpatch_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.failure();
}

#[test]
fn test_config_validate_invalid_regex() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_plan(
		temp_dir.path(),
		r#"
target = "app.ts"

[[rules]]
literal = "ok"
replacement = "fine"

[[rules]]
regex = "[unclosed"
replacement = "x"
"#,
	);

	srcpatch_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Invalid rule 1"));
}

#[test]
fn test_config_show_displays_plan() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_plan(
		temp_dir.path(),
		r#"
target = "app.ts"

[[rules]]
label = "rename"
substitute = "s/foo/bar/g"
required = true
"#,
	);

	srcpatch_cmd()
		.args(["config", "show"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("Rule 0 (rename)"))
		.stdout(predicate::str::contains("substitute: s/foo/bar/g"))
		.stdout(predicate::str::contains("regex: foo"))
		.stdout(predicate::str::contains("replacement: bar"))
		.stdout(predicate::str::contains("all: true"))
		.stdout(predicate::str::contains("required: true"));
}

#[test]
fn test_plan_flag_resolves_target_next_to_plan() {
	let temp_dir = tempfile::tempdir().unwrap();
	let sub = temp_dir.path().join("migrations");
	fs::create_dir(&sub).unwrap();
	fs::write(sub.join("app.ts"), "legacy();\n").unwrap();
	fs::write(
		sub.join("rename.toml"),
		r#"
target = "app.ts"

[[rules]]
literal = "legacy()"
replacement = "modern()"
"#,
	)
	.unwrap();

	srcpatch_cmd()
		.args(["--plan", "migrations/rename.toml"])
		.current_dir(temp_dir.path())
		.assert()
		.success();

	assert_eq!(fs::read_to_string(sub.join("app.ts")).unwrap(), "modern();\n");
}

// ============================================================================
// Pipeline behaviour, end to end
// ============================================================================

#[test]
fn test_scenario_a_import_insertion() {
	let temp_dir = tempfile::tempdir().unwrap();
	let target = temp_dir.path().join("index.ts");
	fs::write(&target, "import X from 'x';\n\nX();\n").unwrap();
	write_plan(
		temp_dir.path(),
		r#"
target = "index.ts"

[[rules]]
literal = "import X from 'x';"
replacement = """
import X from 'x';
import Y from 'y';"""
required = true
"#,
	);

	srcpatch_cmd()
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("Patched"))
		.stdout(predicate::str::contains("[0]: applied (1 replacement)"));

	assert_eq!(
		fs::read_to_string(&target).unwrap(),
		"import X from 'x';\nimport Y from 'y';\n\nX();\n"
	);
}

#[test]
fn test_scenario_b_declaration_append_converges() {
	let temp_dir = tempfile::tempdir().unwrap();
	let target = temp_dir.path().join("App.tsx");
	fs::write(
		&target,
		"function App() {\n  const [a, setA] = useState(false);\n  return null;\n}\n",
	)
	.unwrap();
	write_plan(
		temp_dir.path(),
		r#"
target = "App.tsx"

[[rules]]
label = "second declaration"
regex = 'const \[a, setA\] = useState\(false\);'
replacement = """
$0
  const [b, setB] = useState(false);"""
unless_contains = "const [b, setB]"
"#,
	);

	srcpatch_cmd().current_dir(temp_dir.path()).assert().success();
	let after_first = fs::read_to_string(&target).unwrap();
	assert_eq!(
		after_first,
		"function App() {\n  const [a, setA] = useState(false);\n  const [b, setB] = useState(false);\n  return null;\n}\n"
	);

	srcpatch_cmd()
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("skipped (already present)"));
	assert_eq!(fs::read_to_string(&target).unwrap(), after_first);
}

#[test]
fn test_scenario_c_reformatted_block_leaves_file_untouched() {
	let temp_dir = tempfile::tempdir().unwrap();
	let target = temp_dir.path().join("Toolbar.tsx");
	let original = r#"import A from './A';
const mode = 'edit';

export function Toolbar() {
  return (
    <div>
      <button
          type="button"
          aria-label="Save"
          onClick={save}
          className="btn"
      >
        Save
      </button>
    </div>
  );
}
"#;
	fs::write(&target, original).unwrap();
	write_plan(
		temp_dir.path(),
		r#"
target = "Toolbar.tsx"

[[rules]]
literal = "import A from './A';"
replacement = """
import A from './A';
import B from './B';"""

[[rules]]
literal = "const mode = 'edit';"
replacement = "const mode = 'view';"

[[rules]]
label = "swap save button"
literal = '''
      <button
        type="button"
        aria-label="Save"
        onClick={save}
        className="btn"
      >
        Save
      </button>'''
replacement = "      <SaveButton />"
required = true
"#,
	);

	srcpatch_cmd()
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Required rule 2 (swap save button) did not match"))
		.stderr(predicate::str::contains("aria-label=\"Save\""));

	assert_eq!(fs::read_to_string(&target).unwrap(), original);
}

#[test]
fn test_optional_rule_without_match_is_reported_noop() {
	let temp_dir = tempfile::tempdir().unwrap();
	let target = temp_dir.path().join("a.ts");
	fs::write(&target, "one\n").unwrap();
	write_plan(
		temp_dir.path(),
		r#"
target = "a.ts"

[[rules]]
literal = "absent"
replacement = "x"

[[rules]]
literal = "one"
replacement = "two"
"#,
	);

	srcpatch_cmd()
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("1 of 2 rules applied, 1 no-op"))
		.stdout(predicate::str::contains("[0]: no match"));

	assert_eq!(fs::read_to_string(&target).unwrap(), "two\n");
}

#[test]
fn test_unmatched_optional_rule_is_logged_by_default() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(temp_dir.path().join("a.ts"), "one\n").unwrap();
	write_plan(
		temp_dir.path(),
		r#"
target = "a.ts"

[[rules]]
label = "missing anchor"
literal = "absent"
replacement = "x"
"#,
	);

	srcpatch_cmd()
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stderr(predicate::str::contains("optional rule did not match"));
}

#[test]
fn test_applied_rules_are_logged_at_debug_verbosity() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(temp_dir.path().join("a.ts"), "one\n").unwrap();
	write_plan(
		temp_dir.path(),
		r#"
target = "a.ts"

[[rules]]
literal = "one"
replacement = "two"
"#,
	);

	srcpatch_cmd()
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stderr(predicate::str::contains("rule applied").not());

	fs::write(temp_dir.path().join("a.ts"), "one\n").unwrap();
	srcpatch_cmd()
		.arg("-vv")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stderr(predicate::str::contains("rule applied"));
}

#[test]
fn test_unguarded_rules_converge_on_second_run() {
	let temp_dir = tempfile::tempdir().unwrap();
	let target = temp_dir.path().join("Panel.tsx");
	fs::write(
		&target,
		"const [open, setOpen] = useState(false);\nconst [busy, setBusy] = useState(false);\nimport Old from './Old';\n",
	)
	.unwrap();
	write_plan(
		temp_dir.path(),
		r#"
target = "Panel.tsx"

[[rules]]
literal = "useState(false)"
replacement = "useState<boolean>(false)"
all = true

[[rules]]
regex = "import Old from '([./]+)Old';"
replacement = "import New from '${1}New';"
"#,
	);

	srcpatch_cmd()
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("2 of 2 rules applied"));
	let after_first = fs::read_to_string(&target).unwrap();
	assert_eq!(
		after_first,
		"const [open, setOpen] = useState<boolean>(false);\nconst [busy, setBusy] = useState<boolean>(false);\nimport New from './New';\n"
	);

	srcpatch_cmd()
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("0 of 2 rules applied, 2 no-op"))
		.stdout(predicate::str::contains("[0]: no match"))
		.stdout(predicate::str::contains("[1]: no match"));
	assert_eq!(fs::read_to_string(&target).unwrap(), after_first);
}

#[test]
fn test_order_sensitivity_end_to_end() {
	let temp_dir = tempfile::tempdir().unwrap();
	let target = temp_dir.path().join("a.ts");
	let r1 = "[[rules]]\nliteral = \"A\"\nreplacement = \"A B\"\n";
	let r2 = "[[rules]]\nliteral = \"B\"\nreplacement = \"C\"\n";

	fs::write(&target, "A").unwrap();
	write_plan(temp_dir.path(), &format!("target = \"a.ts\"\n{r1}{r2}"));
	srcpatch_cmd().current_dir(temp_dir.path()).assert().success();
	assert_eq!(fs::read_to_string(&target).unwrap(), "A C");

	fs::write(&target, "A").unwrap();
	write_plan(temp_dir.path(), &format!("target = \"a.ts\"\n{r2}{r1}"));
	srcpatch_cmd().current_dir(temp_dir.path()).assert().success();
	assert_eq!(fs::read_to_string(&target).unwrap(), "A B");
}

#[test]
fn test_dry_run_does_not_write() {
	let temp_dir = tempfile::tempdir().unwrap();
	let target = temp_dir.path().join("a.ts");
	fs::write(&target, "legacy();\n").unwrap();
	write_plan(
		temp_dir.path(),
		r#"
target = "a.ts"

[[rules]]
substitute = "s/legacy/modern/g"
"#,
	);

	srcpatch_cmd()
		.arg("--dry-run")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("Dry run"));

	assert_eq!(fs::read_to_string(&target).unwrap(), "legacy();\n");
}

#[test]
fn test_missing_target_fails() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_plan(
		temp_dir.path(),
		r#"
target = "missing.ts"

[[rules]]
literal = "a"
replacement = "b"
"#,
	);

	srcpatch_cmd()
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Failed to read source file"));

	assert!(!temp_dir.path().join("missing.ts").exists());
}

#[test]
fn test_invalid_regex_prevents_run() {
	let temp_dir = tempfile::tempdir().unwrap();
	let target = temp_dir.path().join("a.ts");
	fs::write(&target, "a\n").unwrap();
	write_plan(
		temp_dir.path(),
		r#"
target = "a.ts"

[[rules]]
literal = "a"
replacement = "b"

[[rules]]
regex = "(a"
replacement = "c"
"#,
	);

	srcpatch_cmd()
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Failed to compile rules"));

	assert_eq!(fs::read_to_string(&target).unwrap(), "a\n");
}
