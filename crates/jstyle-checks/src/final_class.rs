//! Check requiring classes with only private constructors to be `final`.
//!
//! # Rationale
//!
//! A class whose constructors are all private cannot be subclassed from the
//! outside. Declaring it `final` documents that and lets readers stop looking
//! for subclasses.
//!
//! Classes extended by a nested class or by an anonymous class in the same
//! file are exempt, matched by simple name.

use jstyle_core::utils::names::last_segment;
use jstyle_core::utils::{qualified_name, Modifiers, ScopeStack};
use jstyle_core::{
    args, Check, CheckBox, CheckContext, CheckError, CheckOptions, Node, NodeId, OptionError,
    TokenType,
};

/// Check code for final-class.
pub const CODE: &str = "JS003";

/// Check name for final-class.
pub const NAME: &str = "final-class";

/// Message key.
pub const MSG_KEY: &str = "final.class";

const TOKENS: &[TokenType] = &[
    TokenType::ClassDef,
    TokenType::InterfaceDef,
    TokenType::EnumDef,
    TokenType::RecordDef,
    TokenType::AnnotationDef,
    TokenType::CtorDef,
    TokenType::LiteralNew,
];

#[derive(Debug, Clone)]
struct ClassInfo {
    node: NodeId,
    name: String,
    declared_final: bool,
    declared_abstract: bool,
    declared_private: bool,
    declares_ctor: bool,
    non_private_ctor: bool,
}

impl ClassInfo {
    fn of(class: Node<'_>, name: &str) -> Self {
        let modifiers = Modifiers::of(class);
        let declares_ctor = class
            .find_first_token(TokenType::ObjBlock)
            .is_some_and(|block| block.find_first_token(TokenType::CtorDef).is_some());
        Self {
            node: class.id(),
            name: name.to_string(),
            declared_final: modifiers.is_final(),
            declared_abstract: modifiers.is_abstract(),
            declared_private: modifiers.is_private(),
            declares_ctor,
            non_private_ctor: false,
        }
    }

    fn should_be_final(&self, extended: &[String]) -> bool {
        if self.declared_final
            || self.declared_abstract
            || extended.iter().any(|name| *name == self.name)
        {
            return false;
        }
        if self.declares_ctor {
            !self.non_private_ctor
        } else {
            self.declared_private
        }
    }
}

/// Reports classes that can only be instantiated from inside but are not
/// declared `final`.
#[derive(Debug, Default)]
pub struct FinalClass {
    /// One frame per enclosing type; `Some` indexes `classes` for a class.
    scopes: ScopeStack<Option<usize>>,
    classes: Vec<ClassInfo>,
    /// Simple names of classes extended in this file.
    extended: Vec<String>,
}

impl FinalClass {
    /// Creates a new check.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the check; it takes no options.
    ///
    /// # Errors
    ///
    /// Never fails.
    pub fn create(_options: &mut CheckOptions) -> Result<CheckBox, OptionError> {
        Ok(Box::new(Self::new()))
    }

    fn record_super(&mut self, type_node: Option<Node<'_>>) {
        if let Some(type_node) = type_node {
            let name = qualified_name(type_node);
            if !name.is_empty() {
                self.extended.push(last_segment(&name).to_string());
            }
        }
    }
}

impl Check for FinalClass {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires classes with only private constructors to be declared final"
    }

    fn default_tokens(&self) -> &'static [TokenType] {
        TOKENS
    }

    fn required_tokens(&self) -> &'static [TokenType] {
        TOKENS
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[(MSG_KEY, "Class {0} should be declared as final.")]
    }

    fn reset_for_file(&mut self) {
        self.scopes.clear();
        self.classes.clear();
        self.extended.clear();
    }

    fn visit_token(&mut self, node: Node<'_>, _ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        match node.token_type() {
            TokenType::ClassDef => {
                let name = node
                    .find_first_token(TokenType::Ident)
                    .ok_or_else(|| CheckError::unexpected(node))?
                    .text();
                self.scopes.push(Some(self.classes.len()));
                self.classes.push(ClassInfo::of(node, name));
                let extends = node.find_first_token(TokenType::ExtendsClause);
                self.record_super(extends.and_then(Node::first_child));
            }
            TokenType::InterfaceDef
            | TokenType::EnumDef
            | TokenType::RecordDef
            | TokenType::AnnotationDef => self.scopes.push(None),
            TokenType::CtorDef => {
                if !Modifiers::of(node).is_private() {
                    if let Some(&Some(index)) = self.scopes.peek() {
                        self.classes[index].non_private_ctor = true;
                    }
                }
            }
            TokenType::LiteralNew => {
                let anonymous = node
                    .last_child()
                    .is_some_and(|last| last.token_type() == TokenType::ObjBlock);
                if anonymous {
                    self.record_super(node.first_child());
                }
            }
            _ => return Err(CheckError::unexpected(node)),
        }
        Ok(())
    }

    fn leave_token(&mut self, node: Node<'_>, _ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        if node.token_type().is_type_declaration() {
            self.scopes.pop();
        }
        Ok(())
    }

    fn finish_tree(&mut self, root: Node<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        let tree = root.tree();
        for class in &self.classes {
            if class.should_be_final(&self.extended) {
                ctx.log(tree.node(class.node), MSG_KEY, args![class.name.as_str()]);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::run;
    use jstyle_core::MessageArg;

    fn reported(source: &str) -> Vec<(usize, String)> {
        run(NAME, source)
            .into_iter()
            .map(|v| match v.args.first() {
                Some(MessageArg::Str(name)) => (v.line(), name.clone()),
                other => panic!("unexpected args {other:?}"),
            })
            .collect()
    }

    #[test]
    fn private_constructor_requires_final() {
        let source = "\
public class Singleton {
    private Singleton() {}
}
";
        let violations = run(NAME, source);
        assert_eq!(violations.len(), 1);
        assert_eq!((violations[0].line(), violations[0].column()), (1, 1));
        assert_eq!(violations[0].message, "Class Singleton should be declared as final.");
    }

    #[test]
    fn accessible_or_final_classes_pass() {
        let source = "\
final class A { private A() {} }
abstract class B { private B() {} }
class C { C() {} }
class D { private D() {} D(int x) {} }
class E {}
";
        assert!(reported(source).is_empty());
    }

    #[test]
    fn private_class_without_constructor() {
        let source = "\
class Outer {
    private static class Hidden {}
    static class Visible {}
}
";
        assert_eq!(reported(source), vec![(2, "Hidden".to_string())]);
    }

    #[test]
    fn nested_and_anonymous_subclasses_exempt() {
        let source = "\
class Outer {
    private Outer() {}
    static class Base { private Base() {} }
    static class Derived extends Outer.Base {}
    static class Other { private Other() {} }
    Runnable r = new Other() {};
    static class Lonely { private Lonely() {} }
}
";
        assert_eq!(reported(source), vec![(1, "Outer".to_string()), (7, "Lonely".to_string())]);
    }

    #[test]
    fn enum_constructors_do_not_count() {
        let source = "\
class Holder {
    private Holder() {}
    enum Kind { A; Kind() {} }
}
";
        assert_eq!(reported(source), vec![(1, "Holder".to_string())]);
    }
}
