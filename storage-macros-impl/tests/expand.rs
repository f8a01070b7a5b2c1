use insta::assert_snapshot;
use storage_macros_impl::*;

fn expand_one(source: &str) -> Result<Expansion, Diagnostic> {
    let mut results = expand_source(source, &ExpandConfig::default()).expect("declaration parses");
    assert_eq!(results.len(), 1, "expected exactly one directive in {source}");
    results.remove(0)
}

fn message(source: &str) -> String {
    expand_one(source).expect_err("expansion should fail").message()
}

// ============================================================================
// Settings store
// ============================================================================

#[test]
fn non_optional_with_default() {
    let expansion = expand_one(
        r#"@ObservableAppStorage(key: "String") @ObservationIgnored var string: String = "Test""#,
    )
    .unwrap();

    assert_eq!(expansion.identifier, "string");
    assert_eq!(expansion.result_type, "String");
    assert_snapshot!(expansion.accessor_block(), @r#"
    {
        get {
            access(keyPath: \.string)
            return UserDefaults.standard.object(forKey: "String") as? String ?? "Test"
        }
        set {
            withMutation(keyPath: \.string) {
                UserDefaults.standard.set(newValue, forKey: "String")
            }
        }
    }
    "#);
}

#[test]
fn optional_without_default() {
    let expansion = expand_one(
        r#"@ObservableAppStorage(key: "OptionalDate") @ObservationIgnored var date: Date?"#,
    )
    .unwrap();

    assert_eq!(expansion.result_type, "Date?");
    assert_snapshot!(expansion.getter, @r#"
    get {
        access(keyPath: \.date)
        return UserDefaults.standard.object(forKey: "OptionalDate") as? Date
    }
    "#);
}

#[test]
fn optional_with_default_is_rejected() {
    assert_eq!(
        message(r#"@ObservableAppStorage(key: "OptionalDate") @ObservationIgnored var date: Date? = Date()"#),
        "'@ObservableAppStorage' optional type should not have default value"
    );
}

#[test]
fn non_optional_without_default_is_rejected() {
    assert_eq!(
        message(r#"@ObservableAppStorage(key: "count") @ObservationIgnored var count: Int"#),
        "'@ObservableAppStorage' non-optional property has no default value"
    );
}

#[test]
fn explicit_store_is_qualified() {
    let expansion = expand_one(
        r#"@ObservableAppStorage(key: "name", store: .init(suiteName: "group.app")!)
           @ObservationIgnored
           private var name: String = "" "#,
    )
    .unwrap();

    assert_snapshot!(expansion.setter, @r#"
    set {
        withMutation(keyPath: \.name) {
            UserDefaults.init(suiteName: "group.app")!.set(newValue, forKey: "name")
        }
    }
    "#);
}

#[test]
fn qualified_store_is_kept_verbatim() {
    let expansion = expand_one(
        r#"@ObservableAppStorage(store: UserDefaults.shared, key: Keys.theme) @ObservationIgnored var theme: Theme = .system"#,
    )
    .unwrap();

    assert_snapshot!(expansion.getter, @r#"
    get {
        access(keyPath: \.theme)
        return UserDefaults.shared.object(forKey: Keys.theme) as? Theme ?? .system
    }
    "#);
}

#[test]
fn generic_call_defaults_are_copied() {
    let expansion = expand_one(
        r#"@ObservableAppStorage(key: "tags") @ObservationIgnored var tags: Set<String> = Set<String>()"#,
    )
    .unwrap();
    assert_snapshot!(expansion.getter, @r#"
    get {
        access(keyPath: \.tags)
        return UserDefaults.standard.object(forKey: "tags") as? Set<String> ?? Set<String>()
    }
    "#);

    let expansion = expand_one(
        r#"@ObservableAppStorage(key: "scores") @ObservationIgnored var scores: [String: Int] = Dictionary<String, Int>()"#,
    )
    .unwrap();
    assert_snapshot!(expansion.getter, @r#"
    get {
        access(keyPath: \.scores)
        return UserDefaults.standard.object(forKey: "scores") as? [String: Int] ?? (Dictionary<String, Int>())
    }
    "#);
}

#[test]
fn ternary_default_keeps_its_precedence() {
    let expansion = expand_one(
        r#"@ObservableAppStorage(key: "limit") @ObservationIgnored var limit: Int = isPro ? 100 : 10"#,
    )
    .unwrap();
    assert_snapshot!(expansion.getter, @r#"
    get {
        access(keyPath: \.limit)
        return UserDefaults.standard.object(forKey: "limit") as? Int ?? (isPro ? 100 : 10)
    }
    "#);
}

#[test]
fn closure_default_is_copied() {
    let expansion = expand_one(
        r#"@ObservableAppStorage(key: "pick") @ObservationIgnored var pick: (Int) -> Int = { $0 }"#,
    )
    .unwrap();
    assert_eq!(expansion.result_type, "(Int) -> Int");
    assert_snapshot!(expansion.getter, @r#"
    get {
        access(keyPath: \.pick)
        return UserDefaults.standard.object(forKey: "pick") as? ((Int) -> Int) ?? { $0 }
    }
    "#);
}

#[test]
fn key_and_store_arguments_are_copied() {
    let expansion = expand_one(
        r#"@ObservableAppStorage(key: Keys.prefix + "name", store: useGroup ? .group : .standard) @ObservationIgnored var name: String = """#,
    )
    .unwrap();
    assert_snapshot!(expansion.setter, @r#"
    set {
        withMutation(keyPath: \.name) {
            (useGroup ? .group : .standard).set(newValue, forKey: Keys.prefix + "name")
        }
    }
    "#);
}

// ============================================================================
// Secret store
// ============================================================================

#[test]
fn keychain_property() {
    let expansion = expand_one(
        r#"@ObservableKeychain(key: "password") @ObservationIgnored @MainActor var password: String = "x""#,
    )
    .unwrap();

    assert_snapshot!(expansion.accessor_block(), @r#"
    {
        get {
            access(keyPath: \.password)
            return KeychainManager.shared.get(forKey: "password") ?? "x"
        }
        set {
            withMutation(keyPath: \.password) {
                KeychainManager.shared.set(newValue, forKey: "password")
            }
        }
    }
    "#);
}

#[test]
fn keychain_requires_main_actor() {
    let diagnostic = expand_one(
        r#"@ObservableKeychain(key: "password") @ObservationIgnored var password: String = "x""#,
    )
    .unwrap_err();

    assert_eq!(diagnostic.kind, ErrorKind::IsNotMainActor);
    assert_eq!(
        diagnostic.to_string(),
        "1:2: '@ObservableKeychain' must have @MainActor applied"
    );
}

#[test]
fn keychain_rejects_optionals_with_or_without_default() {
    for source in [
        r#"@ObservableKeychain(key: "t") @ObservationIgnored @MainActor var token: String?"#,
        r#"@ObservableKeychain(key: "t") @ObservationIgnored @MainActor var token: String? = nil"#,
    ] {
        assert_eq!(message(source), "'@ObservableKeychain' cannot be optional");
    }
}

#[test]
fn keychain_manager_argument() {
    let expansion = expand_one(
        r#"@ObservableKeychain(key: "pin", manager: .testing) @ObservationIgnored @MainActor var pin: Int = 0"#,
    )
    .unwrap();
    assert!(expansion.getter.contains("return KeychainManager.testing.get(forKey: \"pin\") ?? 0"));
}

// ============================================================================
// Rejections shared by both directives
// ============================================================================

#[test]
fn let_is_not_a_variable_whatever_else_is_wrong() {
    for source in [
        r#"@ObservableAppStorage(key: "a") @ObservationIgnored let a: Int = 1"#,
        r#"@ObservableAppStorage let a"#,
        r#"@ObservableKeychain(1, 2) let (a, b): (Int, Int)"#,
        r#"@ObservableKeychain(key: "a") func a() {}"#,
    ] {
        assert_eq!(
            expand_one(source).unwrap_err().kind,
            ErrorKind::NotAVariable,
            "{source}"
        );
    }
}

#[test]
fn structural_rejections() {
    assert_eq!(
        message(r#"@ObservableAppStorage(key: "a") @ObservationIgnored var a: Int = 0, b: Int = 1"#),
        "'@ObservableAppStorage' cannot be applied to multiple variable bindings"
    );
    assert_eq!(
        message(r#"@ObservableAppStorage(key: "a") @ObservationIgnored var a: Int { 0 }"#),
        "'@ObservableAppStorage' cannot be applied to a computed property"
    );
    assert_eq!(
        message(r#"@ObservableAppStorage(key: "a") @ObservationIgnored var a: Int = 0 { didSet { } }"#),
        "'@ObservableAppStorage' cannot be applied to a computed property"
    );
    assert_eq!(
        message(r#"@ObservableAppStorage(key: "a") @ObservationIgnored var (a, b): (Int, Int) = (0, 0)"#),
        "'@ObservableAppStorage' can only be applied to a variable with a simple name"
    );
}

#[test]
fn argument_rejections() {
    assert_eq!(
        message(r#"@ObservableAppStorage("a") @ObservationIgnored var a: Int = 0"#),
        "'@ObservableAppStorage' arguments must all be labeled"
    );
    assert_eq!(
        message(r#"@ObservableAppStorage @ObservationIgnored var a: Int = 0"#),
        "'@ObservableAppStorage' requires a 'key' argument"
    );
    assert_eq!(
        message(r#"@ObservableAppStorage(store: .standard) @ObservationIgnored var a: Int = 0"#),
        "'@ObservableAppStorage' requires a 'key' argument"
    );
    assert_eq!(
        message(r#"@ObservableAppStorage(key: "a", key: "b") @ObservationIgnored var a: Int = 0"#),
        "'@ObservableAppStorage' argument 'key' is given more than once"
    );
    assert_eq!(
        message(r#"@ObservableAppStorage(key: "a", manager: .shared) @ObservationIgnored var a: Int = 0"#),
        "'@ObservableAppStorage' does not take an argument labeled 'manager'"
    );
}

#[test]
fn missing_tracking_marker() {
    assert_eq!(
        message(r#"@ObservableAppStorage(key: "a") var a: Int = 0"#),
        "'@ObservableAppStorage' must have @ObservationIgnored applied"
    );
    // checked before the type branch
    assert_eq!(
        message(r#"@ObservableAppStorage(key: "a") var a"#),
        "'@ObservableAppStorage' must have @ObservationIgnored applied"
    );
}

#[test]
fn missing_type_annotation() {
    assert_eq!(
        message(r#"@ObservableAppStorage(key: "a") @ObservationIgnored var a = 0"#),
        "'@ObservableAppStorage' requires an explicit type annotation"
    );
}

#[test]
fn each_directive_is_expanded_separately() {
    let results = expand_source(
        r#"@ObservableAppStorage(key: "a") @ObservableKeychain(key: "a") @ObservationIgnored var a: Int = 0"#,
        &ExpandConfig::default(),
    )
    .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert_eq!(
        results[1].as_ref().unwrap_err().kind,
        ErrorKind::IsNotMainActor
    );
}

#[test]
fn declarations_without_directives_expand_to_nothing() {
    let results = expand_source("@ObservationIgnored var a: Int = 0", &ExpandConfig::default()).unwrap();
    assert!(results.is_empty());
}

#[test]
fn expansion_from_a_hand_built_record() {
    let record = DeclarationRecord::variable("launches")
        .with_type("Int")
        .with_initializer("0")
        .with_marker(Marker::ObservationIgnored);
    let directive = DirectiveInvocation::new(
        DirectiveKind::AppStorage,
        vec![DirectiveArgument::labeled("key", "\"launches\"")],
    );

    let expansion = expand(&record, &directive, &ExpandConfig::default()).unwrap();
    assert_eq!(expansion.result_type, "Int");

    let diagnostic = expand(
        &DeclarationRecord::variable("launches").with_marker(Marker::ObservationIgnored),
        &directive,
        &ExpandConfig::default(),
    )
    .unwrap_err();
    assert_eq!(diagnostic.kind, ErrorKind::NoTypeFound);
    assert_eq!(diagnostic.location, None);
}
