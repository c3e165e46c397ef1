use super::*;

#[test]
fn isa_operator_accepted_by_default() {
    let mut parser = Parser::new("my $ok = $obj isa Animal;");
    let _ast = parser.parse();
    assert!(parser.errors().is_empty(), "expected no errors, got {:?}", parser.errors());
}

#[test]
fn isa_operator_rejected_when_disabled() {
    let config = ParserConfig { feature_isa: false, ..ParserConfig::default() };
    let mut parser = Parser::with_config("my $ok = $obj isa Animal;", config);
    let _ast = parser.parse();
    assert!(
        parser.errors().iter().any(|e| matches!(e, ParseError::FeatureDisabled { feature, .. } if feature == "isa")),
        "expected a FeatureDisabled(\"isa\") error, got {:?}",
        parser.errors()
    );
}

#[test]
fn legacy_isa_bareword_is_unaffected_by_feature_flag() {
    // The legacy `@ISA` bareword comparison form predates the `isa` feature
    // and is not gated by it.
    let config = ParserConfig { feature_isa: false, ..ParserConfig::default() };
    let mut parser = Parser::with_config("my $ok = $class ISA Animal;", config);
    let _ast = parser.parse();
    assert!(parser.errors().is_empty(), "expected no errors, got {:?}", parser.errors());
}

#[test]
fn try_catch_rejected_when_disabled() {
    let config = ParserConfig { feature_try: false, ..ParserConfig::default() };
    let mut parser =
        Parser::with_config("try { risky() } catch ($e) { warn $e; }", config);
    let _ast = parser.parse();
    assert!(
        parser.errors().iter().any(|e| matches!(e, ParseError::FeatureDisabled { feature, .. } if feature == "try")),
        "expected a FeatureDisabled(\"try\") error, got {:?}",
        parser.errors()
    );
}

#[test]
fn try_catch_accepted_by_default() {
    let mut parser = Parser::new("try { risky() } catch ($e) { warn $e; }");
    let _ast = parser.parse();
    assert!(parser.errors().is_empty(), "expected no errors, got {:?}", parser.errors());
}

#[test]
fn class_declaration_rejected_when_disabled() {
    let config = ParserConfig { feature_class: false, ..ParserConfig::default() };
    let mut parser = Parser::with_config("class Point { method dist { 0 } }", config);
    let _ast = parser.parse();
    assert!(
        parser.errors().iter().any(|e| matches!(e, ParseError::FeatureDisabled { feature, .. } if feature == "class")),
        "expected a FeatureDisabled(\"class\") error, got {:?}",
        parser.errors()
    );
}

#[test]
fn class_declaration_accepted_by_default() {
    let mut parser = Parser::new("class Point { method dist { 0 } }");
    let _ast = parser.parse();
    assert!(parser.errors().is_empty(), "expected no errors, got {:?}", parser.errors());
}

#[test]
fn all_disabled_gates_every_feature() {
    let config = ParserConfig::all_disabled();
    assert!(!config.feature_isa);
    assert!(!config.feature_try);
    assert!(!config.feature_class);
}
