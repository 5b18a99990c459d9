//! Reconciliation of documented returns against actual control flow.
//!
//! Two trigger points per function, each firing at most once:
//!
//! - the first return statement carrying a real value checks that the
//!   docstring documents the returned value and its type;
//! - after the whole body is known, a documented return value is checked
//!   against whether the body can actually produce one.
//!
//! The checker is pure: it reads immutable facts and accumulates rules, so
//! running it twice over the same facts yields the same set.

use crate::analysis::{FunctionFacts, ReturnFact};
use crate::docstring::{DocFacts, Docstring};

use super::types::Rule;

/// Per-function accumulator for return documentation checks.
pub struct ReturnDocChecker<'a> {
    doc: DocFacts,
    facts: &'a FunctionFacts,
    /// Unrecognized docstrings are exempt from the missing-doc checks
    /// unless this is false.
    accept_undocumented: bool,
    return_trigger_fired: bool,
    finished: bool,
    emitted: Vec<Rule>,
}

impl<'a> ReturnDocChecker<'a> {
    pub fn new(doc: DocFacts, facts: &'a FunctionFacts, accept_undocumented: bool) -> Self {
        Self {
            doc,
            facts,
            accept_undocumented,
            return_trigger_fired: false,
            finished: false,
            emitted: Vec::new(),
        }
    }

    fn emit(&mut self, rule: Rule) {
        if !self.emitted.contains(&rule) {
            self.emitted.push(rule);
        }
    }

    /// Trigger on a return statement.
    ///
    /// Only the first return carrying a real value fires; generators never
    /// fire here (they are judged as a whole in [`finish`]). A function
    /// whose returns are all bare or `None` never reaches this trigger and
    /// owes no return documentation.
    ///
    /// [`finish`]: ReturnDocChecker::finish
    pub fn visit_return(&mut self, ret: &ReturnFact) {
        if self.facts.is_generator || self.return_trigger_fired || !ret.is_meaningful() {
            return;
        }
        self.return_trigger_fired = true;

        if !self.doc.recognized {
            if !self.accept_undocumented {
                self.emit(Rule::MissingReturnDoc);
                self.emit(Rule::MissingReturnTypeDoc);
            }
            return;
        }

        if !self.doc.has_description {
            self.emit(Rule::MissingReturnDoc);
        }
        // An explicit annotation satisfies the type requirement on its own
        if !self.doc.has_type && !self.facts.has_return_annotation {
            self.emit(Rule::MissingReturnTypeDoc);
        }
    }

    /// Trigger once after the whole body has been visited.
    ///
    /// A documented return value is redundant when the body never produces
    /// one: a generator not documented as returning `generator`, or an
    /// ordinary function whose returns are all bare or `None` (or absent
    /// entirely).
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;

        if !self.doc.recognized || (!self.doc.has_description && !self.doc.has_type) {
            return;
        }

        if self.facts.is_generator {
            if !self.doc.declares_generator {
                self.emit(Rule::RedundantReturnsDoc);
            }
            return;
        }

        if !self.facts.has_meaningful_return() {
            self.emit(Rule::RedundantReturnsDoc);
        }
    }

    pub fn into_rules(self) -> Vec<Rule> {
        self.emitted
    }
}

/// Run both triggers over a function and collect the failed rules.
pub fn check_function(
    doc: Option<&Docstring>,
    facts: &FunctionFacts,
    accept_undocumented: bool,
) -> Vec<Rule> {
    let mut checker = ReturnDocChecker::new(DocFacts::of(doc), facts, accept_undocumented);
    for ret in &facts.returns {
        checker.visit_return(ret);
    }
    checker.finish();
    checker.into_rules()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Span;
    use crate::docstring;

    fn ret(has_value: bool, is_none_literal: bool) -> ReturnFact {
        ReturnFact {
            line: 1,
            has_value,
            is_none_literal,
        }
    }

    fn function(returns: Vec<ReturnFact>, is_generator: bool, annotated: bool) -> FunctionFacts {
        FunctionFacts {
            name: "my_func".to_string(),
            span: Span {
                start_byte: 0,
                end_byte: 1,
                start_line: 1,
                start_col: 1,
                end_line: 2,
                end_col: 1,
            },
            docstring: None,
            returns,
            is_generator,
            has_return_annotation: annotated,
        }
    }

    fn run(doc_text: Option<&str>, facts: &FunctionFacts, accept_undocumented: bool) -> Vec<Rule> {
        let doc = doc_text.and_then(|t| docstring::detect(Some(t)));
        check_function(doc.as_ref(), facts, accept_undocumented)
    }

    fn returns_value() -> FunctionFacts {
        function(vec![ret(true, false)], false, false)
    }

    fn returns_none() -> FunctionFacts {
        function(vec![ret(true, true)], false, false)
    }

    #[test]
    fn test_ignores_missing_docstring_by_default() {
        assert!(run(None, &returns_value(), true).is_empty());
    }

    #[test]
    fn test_warns_missing_docstring_when_not_accepted() {
        assert_eq!(
            run(None, &returns_value(), false),
            vec![Rule::MissingReturnDoc, Rule::MissingReturnTypeDoc]
        );
    }

    #[test]
    fn test_ignores_unrecognized_style_by_default() {
        assert!(run(Some("This is a docstring."), &returns_value(), true).is_empty());
    }

    #[test]
    fn test_unrecognized_style_held_to_bar_when_not_accepted() {
        assert_eq!(
            run(Some("This is a docstring."), &returns_value(), false),
            vec![Rule::MissingReturnDoc, Rule::MissingReturnTypeDoc]
        );
    }

    #[test]
    fn test_sphinx_description_without_type() {
        let doc = "This is a docstring.\n\n:returns: Always False";
        assert_eq!(
            run(Some(doc), &returns_value(), true),
            vec![Rule::MissingReturnTypeDoc]
        );
    }

    #[test]
    fn test_annotation_satisfies_type_requirement() {
        let doc = "This is a docstring.\n\n:returns: Always False";
        let facts = function(vec![ret(true, false)], false, true);
        assert!(run(Some(doc), &facts, true).is_empty());
    }

    #[test]
    fn test_sphinx_type_without_description() {
        let doc = "This is a docstring.\n\n:rtype: bool";
        assert_eq!(
            run(Some(doc), &returns_value(), true),
            vec![Rule::MissingReturnDoc]
        );
    }

    #[test]
    fn test_sphinx_params_only_misses_both() {
        let doc = "This is a docstring.\n\n:param doc_type: Sphinx\n:type doc_type: str";
        assert_eq!(
            run(Some(doc), &returns_value(), true),
            vec![Rule::MissingReturnDoc, Rule::MissingReturnTypeDoc]
        );
    }

    #[test]
    fn test_google_description_without_type() {
        let doc = "This is a docstring.\n\nReturns:\n    Always False";
        assert_eq!(
            run(Some(doc), &returns_value(), true),
            vec![Rule::MissingReturnTypeDoc]
        );
    }

    #[test]
    fn test_google_type_without_description() {
        let doc = "This is a docstring.\n\nReturns:\n    bool:";
        assert_eq!(
            run(Some(doc), &returns_value(), true),
            vec![Rule::MissingReturnDoc]
        );
    }

    #[test]
    fn test_google_params_only_misses_both() {
        let doc = "This is a docstring.\n\nParameters:\n    doc_type (str): Google";
        assert_eq!(
            run(Some(doc), &returns_value(), true),
            vec![Rule::MissingReturnDoc, Rule::MissingReturnTypeDoc]
        );
    }

    #[test]
    fn test_numpy_type_without_description() {
        let doc = "This is a docstring.\n\nArguments\n---------\ndoc_type : str\n    Numpy\n\nReturns\n-------\nbool";
        assert_eq!(
            run(Some(doc), &returns_value(), true),
            vec![Rule::MissingReturnDoc]
        );
    }

    #[test]
    fn test_numpy_params_only_misses_both() {
        let doc =
            "This is a docstring.\n\nArguments\n---------\ndoc_type : str\n    Numpy";
        assert_eq!(
            run(Some(doc), &returns_value(), true),
            vec![Rule::MissingReturnDoc, Rule::MissingReturnTypeDoc]
        );
    }

    #[test]
    fn test_numpy_bare_type_section_alone() {
        let doc = "This is a docstring.\n\nReturns\n-------\nbool";
        assert_eq!(
            run(Some(doc), &returns_value(), true),
            vec![Rule::MissingReturnDoc]
        );
    }

    #[test]
    fn test_complete_sphinx_documentation() {
        let doc = "This is a docstring.\n\n:return: Always False\n:rtype: bool";
        assert!(run(Some(doc), &returns_value(), true).is_empty());
    }

    #[test]
    fn test_complete_google_documentation() {
        let doc = "This is a docstring.\n\nReturns:\n    bool: Always False";
        assert!(run(Some(doc), &returns_value(), true).is_empty());
    }

    #[test]
    fn test_complete_numpy_documentation() {
        let doc = "This is a docstring.\n\nReturns\n-------\nbool\n    Always False";
        assert!(run(Some(doc), &returns_value(), true).is_empty());
    }

    #[test]
    fn test_numpy_of_wrapper_documentation() {
        let doc =
            "This is a docstring.\n\nReturns\n-------\n:obj:`list` of :obj:`str`\n    List of strings";
        assert!(run(Some(doc), &returns_value(), true).is_empty());
    }

    #[test]
    fn test_bare_return_never_triggers_missing_docs() {
        let doc = "This is a docstring.\n\n:param doc_type: Sphinx\n:type doc_type: str";
        let facts = function(vec![ret(false, false)], false, false);
        assert!(run(Some(doc), &facts, true).is_empty());
    }

    #[test]
    fn test_custom_class_documentation() {
        let doc = "This is a docstring.\n\n:returns: An object\n:rtype: :class:`mymodule.Class`";
        assert!(run(Some(doc), &returns_value(), true).is_empty());

        let doc = "This is a docstring.\n\nReturns:\n    mymodule.Class: An object";
        assert!(run(Some(doc), &returns_value(), true).is_empty());

        let doc = "This is a docstring.\n\nReturns\n-------\n    mymodule.Class\n        An object";
        assert!(run(Some(doc), &returns_value(), true).is_empty());
    }

    #[test]
    fn test_container_of_custom_class_documentation() {
        let doc =
            "This is a docstring.\n\n:returns: An object\n:rtype: list(:class:`mymodule.Class`)";
        assert!(run(Some(doc), &returns_value(), true).is_empty());
    }

    #[test]
    fn test_container_type_without_description_misses_doc() {
        let doc = "This is a docstring.\n\n:rtype: list(:class:`mymodule.Class`)";
        assert_eq!(
            run(Some(doc), &returns_value(), true),
            vec![Rule::MissingReturnDoc]
        );

        let doc = "This is a docstring.\n\nReturns:\n    list(:class:`mymodule.Class`):";
        assert_eq!(
            run(Some(doc), &returns_value(), true),
            vec![Rule::MissingReturnDoc]
        );

        let doc = "This is a docstring.\n\nReturns\n-------\n    list(:class:`mymodule.Class`)";
        assert_eq!(
            run(Some(doc), &returns_value(), true),
            vec![Rule::MissingReturnDoc]
        );
    }

    #[test]
    fn test_redundant_description_for_none_return() {
        let doc = "This is a docstring.\n\n:returns: One";
        assert_eq!(
            run(Some(doc), &returns_none(), true),
            vec![Rule::RedundantReturnsDoc]
        );
    }

    #[test]
    fn test_redundant_type_for_none_return() {
        let doc = "This is a docstring.\n\n:rtype: int";
        assert_eq!(
            run(Some(doc), &returns_none(), true),
            vec![Rule::RedundantReturnsDoc]
        );
    }

    #[test]
    fn test_redundant_google_docs_for_none_return() {
        let doc = "This is a docstring.\n\nReturns:\n    One";
        assert_eq!(
            run(Some(doc), &returns_none(), true),
            vec![Rule::RedundantReturnsDoc]
        );

        let doc = "This is a docstring.\n\nReturns:\n    int:";
        assert_eq!(
            run(Some(doc), &returns_none(), true),
            vec![Rule::RedundantReturnsDoc]
        );
    }

    #[test]
    fn test_redundant_numpy_docs_for_none_return() {
        let doc = "This is a docstring.\n\nReturns\n-------\n    int\n        One";
        assert_eq!(
            run(Some(doc), &returns_none(), true),
            vec![Rule::RedundantReturnsDoc]
        );

        let doc = "This is a docstring.\n\nReturns\n-------\n    int";
        assert_eq!(
            run(Some(doc), &returns_none(), true),
            vec![Rule::RedundantReturnsDoc]
        );
    }

    #[test]
    fn test_redundant_docs_without_any_return_statement() {
        let doc = "This is a docstring.\n\n:returns: One\n:rtype: int";
        let facts = function(Vec::new(), false, false);
        assert_eq!(
            run(Some(doc), &facts, true),
            vec![Rule::RedundantReturnsDoc]
        );
    }

    #[test]
    fn test_meaningful_return_on_any_branch_is_enough() {
        // One branch returns None, another a real value: documented docs
        // match the actual behavior
        let facts = function(vec![ret(true, true), ret(true, false)], false, false);

        let doc = "This is a docstring.\n\n:returns: One\n:rtype: int\n\n:returns: None sometimes\n:rtype: None";
        assert!(run(Some(doc), &facts, true).is_empty());

        let doc = "This is a docstring.\n\nReturns:\n    int or None: One, or sometimes None.";
        assert!(run(Some(doc), &facts, true).is_empty());

        let doc =
            "This is a docstring.\n\nReturns\n-------\n    int\n        One\n    None\n        Sometimes";
        assert!(run(Some(doc), &facts, true).is_empty());
    }

    #[test]
    fn test_generator_documented_as_generator() {
        let doc = "This is a docstring.\n\n:returns: One\n:rtype: generator";
        let facts = function(Vec::new(), true, false);
        assert!(run(Some(doc), &facts, true).is_empty());
    }

    #[test]
    fn test_generator_documented_with_concrete_type_is_redundant() {
        let facts = function(Vec::new(), true, false);

        let doc = "This is a docstring.\n\nReturns:\n    int: One";
        assert_eq!(
            run(Some(doc), &facts, true),
            vec![Rule::RedundantReturnsDoc]
        );

        let doc = "This is a docstring.\n\nReturns\n-------\n    int\n        One";
        assert_eq!(
            run(Some(doc), &facts, true),
            vec![Rule::RedundantReturnsDoc]
        );
    }

    #[test]
    fn test_generator_with_meaningful_return_skips_return_trigger() {
        // `return x` inside a generator terminates it; the docstring checks
        // only judge the function as a whole
        let doc = "This is a docstring.\n\n:rtype: generator";
        let facts = function(vec![ret(true, false)], true, false);
        assert!(run(Some(doc), &facts, true).is_empty());
    }

    #[test]
    fn test_undocumented_generator_is_ignored() {
        let facts = function(Vec::new(), true, false);
        assert!(run(Some("This is a docstring."), &facts, true).is_empty());
        assert!(run(None, &facts, true).is_empty());
    }

    #[test]
    fn test_missing_doc_emitted_once_for_many_returns() {
        let doc = "This is a docstring.\n\n:rtype: bool";
        let facts = function(
            vec![ret(true, false), ret(true, false), ret(true, false)],
            false,
            false,
        );
        assert_eq!(run(Some(doc), &facts, true), vec![Rule::MissingReturnDoc]);
    }

    #[test]
    fn test_idempotent_over_same_facts() {
        let doc = "This is a docstring.\n\n:rtype: bool";
        let facts = returns_value();
        let first = run(Some(doc), &facts, true);
        let second = run(Some(doc), &facts, true);
        assert_eq!(first, second);
    }

    #[test]
    fn test_visit_return_after_finish_cannot_double_emit() {
        let doc = docstring::detect(Some("This is a docstring.\n\n:rtype: int"));
        let facts = returns_none();
        let mut checker = ReturnDocChecker::new(DocFacts::of(doc.as_ref()), &facts, true);
        for r in &facts.returns {
            checker.visit_return(r);
        }
        checker.finish();
        checker.finish();
        assert_eq!(checker.into_rules(), vec![Rule::RedundantReturnsDoc]);
    }
}
