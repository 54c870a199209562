//! Check limiting the number of methods declared by a type.
//!
//! # Rationale
//!
//! A type with many methods usually carries too many responsibilities.
//! Limits can be set per access level as well as in total.
//!
//! # Configuration
//!
//! - `max_total`: Maximum number of methods (default: 100)
//! - `max_private`: Maximum number of private methods (default: 100)
//! - `max_package`: Maximum number of package-private methods (default: 100)
//! - `max_protected`: Maximum number of protected methods (default: 100)
//! - `max_public`: Maximum number of public methods (default: 100)
//!
//! Methods of nested and anonymous types count toward their own type only.

use jstyle_core::utils::scope::declared_access;
use jstyle_core::utils::{AccessModifier, ScopeStack};
use jstyle_core::{
    args, Check, CheckBox, CheckContext, CheckError, CheckOptions, Node, NodeId, OptionError,
    TokenType,
};

/// Check code for method-count.
pub const CODE: &str = "JS006";

/// Check name for method-count.
pub const NAME: &str = "method-count";

/// Message key for too many private methods.
pub const MSG_PRIVATE_METHODS: &str = "too.many.privateMethods";

/// Message key for too many package-private methods.
pub const MSG_PACKAGE_METHODS: &str = "too.many.packageMethods";

/// Message key for too many protected methods.
pub const MSG_PROTECTED_METHODS: &str = "too.many.protectedMethods";

/// Message key for too many public methods.
pub const MSG_PUBLIC_METHODS: &str = "too.many.publicMethods";

/// Message key for too many methods in total.
pub const MSG_MANY_METHODS: &str = "too.many.methods";

const DEFAULT_MAX: usize = 100;

/// Method counts of one type body.
#[derive(Debug)]
struct Counter {
    scope: NodeId,
    private: usize,
    package: usize,
    protected: usize,
    public: usize,
}

impl Counter {
    fn new(scope: NodeId) -> Self {
        Self {
            scope,
            private: 0,
            package: 0,
            protected: 0,
            public: 0,
        }
    }

    fn increment(&mut self, access: AccessModifier) {
        match access {
            AccessModifier::Private => self.private += 1,
            AccessModifier::Package => self.package += 1,
            AccessModifier::Protected => self.protected += 1,
            AccessModifier::Public => self.public += 1,
        }
    }

    fn total(&self) -> usize {
        self.private + self.package + self.protected + self.public
    }
}

/// Limits method counts per type.
#[derive(Debug)]
pub struct MethodCount {
    /// Maximum number of methods.
    pub max_total: usize,
    /// Maximum number of private methods.
    pub max_private: usize,
    /// Maximum number of package-private methods.
    pub max_package: usize,
    /// Maximum number of protected methods.
    pub max_protected: usize,
    /// Maximum number of public methods.
    pub max_public: usize,
    counters: ScopeStack<Counter>,
}

impl Default for MethodCount {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodCount {
    /// Creates a new check with every limit at 100.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_total: DEFAULT_MAX,
            max_private: DEFAULT_MAX,
            max_package: DEFAULT_MAX,
            max_protected: DEFAULT_MAX,
            max_public: DEFAULT_MAX,
            counters: ScopeStack::new(),
        }
    }

    /// Builds the check from configured options.
    ///
    /// # Errors
    ///
    /// Fails on malformed option values.
    pub fn create(options: &mut CheckOptions) -> Result<CheckBox, OptionError> {
        Ok(Box::new(Self {
            max_total: options.usize("max_total", DEFAULT_MAX)?,
            max_private: options.usize("max_private", DEFAULT_MAX)?,
            max_package: options.usize("max_package", DEFAULT_MAX)?,
            max_protected: options.usize("max_protected", DEFAULT_MAX)?,
            max_public: options.usize("max_public", DEFAULT_MAX)?,
            ..Self::new()
        }))
    }

    /// A method belongs to the innermost open scope when that scope is its
    /// grandparent (scope, then body, then method).
    fn in_latest_scope(&self, method: Node<'_>) -> bool {
        let grandparent = method.parent().and_then(Node::parent).map(Node::id);
        self.counters
            .peek()
            .is_some_and(|counter| Some(counter.scope) == grandparent)
    }

    fn check_counter(&self, counter: &Counter, node: Node<'_>, ctx: &mut CheckContext<'_>) {
        let limits = [
            (counter.private, self.max_private, MSG_PRIVATE_METHODS),
            (counter.package, self.max_package, MSG_PACKAGE_METHODS),
            (counter.protected, self.max_protected, MSG_PROTECTED_METHODS),
            (counter.public, self.max_public, MSG_PUBLIC_METHODS),
            (counter.total(), self.max_total, MSG_MANY_METHODS),
        ];
        for (value, max, key) in limits {
            if value > max {
                ctx.log(node, key, args![value, max]);
            }
        }
    }
}

impl Check for MethodCount {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Limits the number of methods per type and access level"
    }

    fn default_tokens(&self) -> &'static [TokenType] {
        &[
            TokenType::ClassDef,
            TokenType::EnumConstantDef,
            TokenType::EnumDef,
            TokenType::InterfaceDef,
            TokenType::AnnotationDef,
            TokenType::MethodDef,
            TokenType::RecordDef,
        ]
    }

    fn required_tokens(&self) -> &'static [TokenType] {
        &[TokenType::MethodDef]
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[
            (
                MSG_PRIVATE_METHODS,
                "Number of private methods is {0} (max allowed is {1}).",
            ),
            (
                MSG_PACKAGE_METHODS,
                "Number of package methods is {0} (max allowed is {1}).",
            ),
            (
                MSG_PROTECTED_METHODS,
                "Number of protected methods is {0} (max allowed is {1}).",
            ),
            (
                MSG_PUBLIC_METHODS,
                "Number of public methods is {0} (max allowed is {1}).",
            ),
            (
                MSG_MANY_METHODS,
                "Total number of methods is {0} (max allowed is {1}).",
            ),
        ]
    }

    fn reset_for_file(&mut self) {
        self.counters.clear();
    }

    fn visit_token(&mut self, node: Node<'_>, _ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        if node.token_type() == TokenType::MethodDef {
            if self.in_latest_scope(node) {
                let access = declared_access(node);
                if let Some(counter) = self.counters.peek_mut() {
                    counter.increment(access);
                }
            }
        } else {
            self.counters.push(Counter::new(node.id()));
        }
        Ok(())
    }

    fn leave_token(&mut self, node: Node<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        if node.token_type() != TokenType::MethodDef {
            let counter = self
                .counters
                .pop()
                .ok_or_else(|| CheckError::new("method counter stack underflow"))?;
            self.check_counter(&counter, node, ctx);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::run_with;
    use jstyle_core::{CheckSettings, MessageArg};

    const SOURCE: &str = "\
class Service {
    public void a() {}
    public void b() {}
    protected void c() {}
    void d() {}
    private void e() {}
    private void f() {}
    class Inner {
        public void g() {}
    }
    Runnable r = new Runnable() {
        public void run() {}
    };
}
";

    fn keys(settings: CheckSettings) -> Vec<(usize, String, Vec<MessageArg>)> {
        run_with(settings, SOURCE)
            .into_iter()
            .map(|v| (v.line(), v.key, v.args))
            .collect()
    }

    #[test]
    fn counts_per_access_level() {
        let settings = CheckSettings::named(NAME)
            .option("max_public", "1")
            .option("max_private", "1");
        assert_eq!(
            keys(settings),
            vec![
                (
                    1,
                    MSG_PRIVATE_METHODS.to_string(),
                    vec![MessageArg::Int(2), MessageArg::Int(1)]
                ),
                (
                    1,
                    MSG_PUBLIC_METHODS.to_string(),
                    vec![MessageArg::Int(2), MessageArg::Int(1)]
                ),
            ]
        );
    }

    #[test]
    fn nested_types_counted_separately() {
        let settings = CheckSettings::named(NAME).option("max_total", "5");
        let violations = run_with(settings, SOURCE);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "Total number of methods is 6 (max allowed is 5).");
    }

    #[test]
    fn interface_methods_are_public() {
        let source = "\
interface Api {
    void a();
    void b();
    private void c() {}
}
";
        let settings = CheckSettings::named(NAME).option("max_public", "1");
        let violations = run_with(settings, source);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].key, MSG_PUBLIC_METHODS);
        assert_eq!(violations[0].args, vec![MessageArg::Int(2), MessageArg::Int(1)]);
    }

    #[test]
    fn enum_constant_bodies_are_scopes() {
        let source = "\
enum Op {
    PLUS {
        int apply(int a, int b) { return a + b; }
        int twice(int a) { return a * 2; }
    };
    int apply(int a, int b) { return 0; }
}
";
        let settings = CheckSettings::named(NAME).option("max_total", "1");
        let lines: Vec<_> = run_with(settings, source).iter().map(|v| v.line()).collect();
        assert_eq!(lines, vec![2]);
    }
}
