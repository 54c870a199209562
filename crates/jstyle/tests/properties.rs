//! End-to-end properties of the engine, exercised with the Java front end
//! and the built-in checks.

use jstyle::checks::builtin_registry;
use jstyle::{
    args, Analyzer, Check, CheckBox, CheckContext, CheckError, CheckOptions, CheckSettings,
    CommentIndex, FileContents, JavaParser, MessageArg, Node, OptionError, SourceParser,
    SuppressionConfig, TokenType, TreeWalker, Violation,
};
use std::fs;
use std::path::PathBuf;

const NESTED: &str = "\
class Outer {
    private Outer() {}
    class Inner {
        private Inner() {}
        int f(int x) {
            if (x > 0) {
                return 1;
            } else if (x < 0) {
                return -1;
            }
            return 0;
        }
    }
    Runnable r = () -> { return; };
}
";

const THROWING: &str = "\
public class Service {
    public void load() throws java.io.IOException, IllegalStateException, RuntimeException {}
    public void save() throws java.io.IOException {}
}
";

/// Verifies that every leave closes the most recently visited node, and that
/// the node visited next lies beneath every node still open.
#[derive(Default)]
struct Pairing {
    open: Vec<jstyle::NodeId>,
    visits: usize,
}

impl Pairing {
    fn create(_options: &mut CheckOptions) -> Result<CheckBox, OptionError> {
        Ok(Box::new(Self::default()))
    }
}

impl Check for Pairing {
    fn name(&self) -> &'static str {
        "pairing"
    }

    fn code(&self) -> &'static str {
        "T001"
    }

    fn default_tokens(&self) -> &'static [TokenType] {
        &[
            TokenType::ClassDef,
            TokenType::ObjBlock,
            TokenType::MethodDef,
            TokenType::CtorDef,
            TokenType::Slist,
            TokenType::LiteralIf,
            TokenType::LiteralElse,
            TokenType::LiteralReturn,
            TokenType::Lambda,
            TokenType::Ident,
        ]
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[("pairing.visits", "{0} visits paired.")]
    }

    fn reset_for_file(&mut self) {
        self.open.clear();
        self.visits = 0;
    }

    fn visit_token(&mut self, node: Node<'_>, _ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        if let Some(&top) = self.open.last() {
            if !node.ancestors().any(|a| a.id() == top) {
                return Err(CheckError::new("visited node outside the open node"));
            }
        }
        self.open.push(node.id());
        self.visits += 1;
        Ok(())
    }

    fn leave_token(&mut self, node: Node<'_>, _ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        match self.open.pop() {
            Some(id) if id == node.id() => Ok(()),
            _ => Err(CheckError::unexpected(node)),
        }
    }

    fn finish_tree(&mut self, root: Node<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        if !self.open.is_empty() {
            return Err(CheckError::new("unclosed nodes at end of file"));
        }
        ctx.log(root, "pairing.visits", args![self.visits]);
        Ok(())
    }
}

/// Reports every method under a configurable key.
struct Echo {
    key: &'static str,
}

impl Echo {
    fn create(options: &mut CheckOptions) -> Result<CheckBox, OptionError> {
        let key = match options.string("key", "first").as_str() {
            "second" => "echo.second",
            _ => "echo.first",
        };
        Ok(Box::new(Self { key }))
    }
}

impl Check for Echo {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn code(&self) -> &'static str {
        "T002"
    }

    fn default_tokens(&self) -> &'static [TokenType] {
        &[TokenType::MethodDef]
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[("echo.first", "Method."), ("echo.second", "Method again.")]
    }

    fn reset_for_file(&mut self) {}

    fn visit_token(&mut self, node: Node<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        ctx.log(node, self.key, args![]);
        Ok(())
    }
}

/// Tracks class nesting and aborts the file inside a class named `Boom`.
#[derive(Default)]
struct Depth {
    classes: Vec<jstyle::NodeId>,
}

impl Depth {
    fn create(_options: &mut CheckOptions) -> Result<CheckBox, OptionError> {
        Ok(Box::new(Self::default()))
    }
}

impl Check for Depth {
    fn name(&self) -> &'static str {
        "depth"
    }

    fn code(&self) -> &'static str {
        "T003"
    }

    fn default_tokens(&self) -> &'static [TokenType] {
        &[TokenType::ClassDef]
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[("depth.at.root", "Depth {0} at root.")]
    }

    fn reset_for_file(&mut self) {
        self.classes.clear();
    }

    fn begin_tree(&mut self, root: Node<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        ctx.log(root, "depth.at.root", args![self.classes.len()]);
        Ok(())
    }

    fn visit_token(&mut self, node: Node<'_>, _ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        self.classes.push(node.id());
        match node.find_first_token(TokenType::Ident) {
            Some(ident) if ident.text() == "Boom" => Err(CheckError::new("boom")),
            _ => Ok(()),
        }
    }

    fn leave_token(&mut self, _node: Node<'_>, _ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        self.classes.pop();
        Ok(())
    }
}

fn registry() -> jstyle::CheckRegistry {
    let mut registry = builtin_registry();
    registry
        .register(Pairing::create)
        .register(Echo::create)
        .register(Depth::create);
    registry
}

fn analyzer(checks: Vec<CheckSettings>) -> Analyzer {
    Analyzer::builder()
        .parser(JavaParser::new())
        .registry(registry())
        .checks(checks)
        .build()
        .unwrap()
}

fn stateful_checks() -> Vec<CheckSettings> {
    ["final-class", "method-count", "return-count", "inner-type-last", "throws-count"]
        .into_iter()
        .map(CheckSettings::named)
        .chain([CheckSettings::named("return-count").option("max", "0")])
        .collect()
}

fn rendered(violations: &[Violation]) -> Vec<String> {
    violations.iter().map(Violation::format).collect()
}

fn walker(checks: &[CheckSettings]) -> TreeWalker {
    registry()
        .plan(checks, JavaParser::new().token_universe())
        .unwrap()
        .instantiate()
        .unwrap()
}

fn walk(
    walker: &mut TreeWalker,
    path: &str,
    source: &str,
) -> Result<Vec<Violation>, jstyle::FileError> {
    let contents = FileContents::new(path, source);
    let parsed = JavaParser::new().parse(&contents).unwrap();
    let comments = CommentIndex::new(&contents, parsed.comments);
    Ok(walker
        .walk(&parsed.tree, &contents, &comments)?
        .into_ordered(&[]))
}

#[test]
fn repeated_runs_are_identical() {
    let analyzer = analyzer(stateful_checks());
    let first = analyzer.analyze_source("Outer.java", NESTED).unwrap();
    let second = analyzer.analyze_source("Outer.java", NESTED).unwrap();
    assert!(!first.violations.is_empty());
    assert_eq!(rendered(&first.violations), rendered(&second.violations));
}

#[test]
fn file_results_do_not_depend_on_other_files() {
    let dir = tempfile::TempDir::new().unwrap();
    let names = ["Outer.java", "Service.java", "Zeta.java"];
    let sources = [NESTED, THROWING, "final class Zeta { private Zeta() {} }\n"];
    for (name, source) in names.iter().zip(sources) {
        fs::write(dir.path().join(name), source).unwrap();
    }

    let checks = stateful_checks();
    let alone: Vec<Vec<String>> = names
        .iter()
        .zip(sources)
        .map(|(name, source)| {
            rendered(&analyzer(checks.clone()).analyze_source(*name, source).unwrap().violations)
        })
        .collect();

    for threads in [1, 4] {
        let analyzer = Analyzer::builder()
            .root(dir.path())
            .parser(JavaParser::new())
            .registry(registry())
            .checks(checks.clone())
            .parallelism(threads)
            .build()
            .unwrap();
        let paths: Vec<PathBuf> = names.iter().rev().map(|n| dir.path().join(n)).collect();
        let result = analyzer.analyze_paths(&paths).unwrap();
        assert!(result.failures.is_empty());
        let together: Vec<Vec<String>> = result
            .reports
            .iter()
            .map(|r| rendered(&r.violations))
            .collect();
        assert_eq!(together, alone, "with {threads} thread(s)");
    }
}

#[test]
fn state_is_reset_after_a_failed_file() {
    let checks = [CheckSettings::named("depth"), CheckSettings::named("final-class")];
    let mut reused = walker(&checks);

    let failed = walk(
        &mut reused,
        "Boom.java",
        "class A { class B { class Boom {} } }\n",
    );
    let err = failed.unwrap_err();
    assert!(err.to_string().contains("boom"), "{err}");

    let second = walk(&mut reused, "Outer.java", NESTED).unwrap();
    let fresh = walk(&mut walker(&checks), "Outer.java", NESTED).unwrap();
    assert_eq!(second[0].key, "depth.at.root");
    assert_eq!(second[0].args, vec![MessageArg::Int(0)]);
    assert_eq!(rendered(&second), rendered(&fresh));
}

#[test]
fn every_visit_is_left_in_nesting_order() {
    let report = analyzer(vec![CheckSettings::named("pairing")])
        .analyze_source("Outer.java", NESTED)
        .unwrap();
    assert_eq!(report.violations.len(), 1);
    let MessageArg::Int(visits) = &report.violations[0].args[0] else {
        panic!("expected a count");
    };
    assert!(*visits > 20, "only {visits} visits");
}

#[test]
fn identical_reports_from_different_checks_collapse() {
    let source = "class A {\n    void a() {}\n    void b() {}\n}\n";
    let same = analyzer(vec![
        CheckSettings::named("echo"),
        CheckSettings::named("echo").option("key", "first"),
    ])
    .analyze_source("A.java", source)
    .unwrap();
    assert_eq!(same.violations.len(), 2);

    let different = analyzer(vec![
        CheckSettings::named("echo"),
        CheckSettings::named("echo").option("key", "second"),
    ])
    .analyze_source("A.java", source)
    .unwrap();
    let keys: Vec<_> = different
        .violations
        .iter()
        .map(|v| (v.line(), v.key.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![
            (2, "echo.first"),
            (2, "echo.second"),
            (3, "echo.first"),
            (3, "echo.second"),
        ]
    );
}

#[test]
fn throws_count_reports_count_and_limit() {
    let report = analyzer(vec![CheckSettings::named("throws-count")])
        .analyze_source("Service.java", THROWING)
        .unwrap();
    assert_eq!(report.violations.len(), 1);
    let violation = &report.violations[0];
    assert_eq!(violation.line(), 2);
    assert_eq!(violation.args, vec![MessageArg::Int(3), MessageArg::Int(1)]);
    assert_eq!(violation.message, "Throws count is 3 (max allowed is 1).");
}

#[test]
fn tail_comment_allows_escape_only_when_present() {
    let source = "\
class A {
    String s = \"\\u03bc\"; // comment
    String t = \"\\u03bc\";
}
";
    let contents = FileContents::new("A.java", source);
    let parsed = JavaParser::new().parse(&contents).unwrap();
    let literals: Vec<Node<'_>> = parsed
        .tree
        .iter()
        .filter(|n| n.token_type() == TokenType::StringLiteral)
        .collect();
    let comments = CommentIndex::new(&contents, parsed.comments.clone());
    assert!(comments.trailing_comment_after(literals[0]).is_some());
    assert!(comments.trailing_comment_after(literals[1]).is_none());

    let lines = |settings: CheckSettings| -> Vec<usize> {
        analyzer(vec![settings])
            .analyze_source("A.java", source)
            .unwrap()
            .violations
            .iter()
            .map(Violation::line)
            .collect()
    };
    assert_eq!(lines(CheckSettings::named("avoid-escaped-unicode")), vec![2, 3]);
    assert_eq!(
        lines(CheckSettings::named("avoid-escaped-unicode").option("allow_by_tail_comment", "true")),
        vec![3]
    );
}

#[test]
fn suppression_region_filters_only_the_named_check() {
    let source = "\
class A {
    void a() {}
    void b() {}
    void c() {}
    void d() {}
    void e() {}
    void f() {}
    void g() {}
    void h() {}
    void i() throws E1, E2 {}
    void j() {}
}
";
    let analyzer = Analyzer::builder()
        .parser(JavaParser::new())
        .registry(registry())
        .checks(vec![
            CheckSettings::named("throws-count"),
            CheckSettings::named("echo"),
        ])
        .suppression(SuppressionConfig {
            files: "**/*.java".to_string(),
            checks: Some("throws-count".to_string()),
            lines: Some("8-12".to_string()),
        })
        .build()
        .unwrap();
    let report = analyzer.analyze_source("src/A.java", source).unwrap();
    let on_line_ten: Vec<_> = report
        .violations
        .iter()
        .filter(|v| v.line() == 10)
        .map(|v| v.check.as_str())
        .collect();
    assert_eq!(on_line_ten, vec!["echo"]);

    let unsuppressed = jstyle::analyzer_with(vec![CheckSettings::named("throws-count")])
        .unwrap()
        .analyze_source("src/A.java", source)
        .unwrap();
    assert_eq!(unsuppressed.violations.len(), 1);
    assert_eq!(unsuppressed.violations[0].line(), 10);
}
