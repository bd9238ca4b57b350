use maskrouter::method::{MethodFlag, MethodSet};
use maskrouter::router::{MalformedMaskError, MaskPattern, RegisterError, RouteTable};

fn zoo_table() -> RouteTable {
    let mut table = RouteTable::new();
    let noop = |_: &mut maskrouter::Request, _: &mut maskrouter::Response| {};
    table.register(MethodFlag::Get, "/", noop).unwrap();
    table
        .register(MethodFlag::Get | MethodFlag::Post, "/zoo/animals", noop)
        .unwrap();
    table
        .register(
            MethodFlag::Get | MethodFlag::Put | MethodFlag::Patch | MethodFlag::Delete,
            r"/zoo/animals/{id:\d+}",
            noop,
        )
        .unwrap();
    table.register(MethodFlag::Head, "/zoo/health", noop).unwrap();
    table
}

#[test]
fn test_table_groups_by_method_set() {
    let table = zoo_table();
    assert_eq!(table.len(), 4);
    let sets: Vec<MethodSet> = table.groups().iter().map(|g| g.methods()).collect();
    assert_eq!(
        sets,
        vec![
            MethodFlag::Get.into(),
            MethodFlag::Get | MethodFlag::Post,
            MethodFlag::Get | MethodFlag::Put | MethodFlag::Patch | MethodFlag::Delete,
            MethodFlag::Head.into(),
        ]
    );
    assert_eq!(
        table.eligible_methods().names(),
        vec!["GET", "POST", "PUT", "DELETE", "HEAD", "PATCH"]
    );
}

#[test]
fn test_same_set_built_in_different_order_shares_group() {
    let mut table = RouteTable::new();
    table
        .register(MethodFlag::Post | MethodFlag::Get, "/a", |_, _| {})
        .unwrap();
    table
        .register(MethodFlag::Get | MethodFlag::Post, "/b", |_, _| {})
        .unwrap();
    assert_eq!(table.groups().len(), 1);
    let masks: Vec<&str> = table.groups()[0]
        .routes()
        .iter()
        .map(|r| r.mask().mask())
        .collect();
    assert_eq!(masks, vec!["/a", "/b"]);
}

#[test]
fn test_registration_errors() {
    let mut table = RouteTable::new();
    let err = table
        .register(MethodFlag::Get, "/files/{path", |_, _| {})
        .unwrap_err();
    assert!(matches!(
        err,
        RegisterError::MalformedMask(MalformedMaskError::UnexpectedToken { .. })
    ));

    let err = table
        .register(MethodFlag::Get, "/a]", |_, _| {})
        .unwrap_err();
    assert!(matches!(
        err,
        RegisterError::MalformedMask(MalformedMaskError::UnbalancedBrackets { .. })
    ));

    assert!(matches!(
        table.register(MethodSet::EMPTY, "/a", |_, _| {}),
        Err(RegisterError::EmptyMethodSet { .. })
    ));
    assert!(table.is_empty());
}

#[test]
fn test_literal_mask_is_exact() {
    let mask = MaskPattern::compile("/user/list").unwrap();
    assert!(mask.is_literal());
    assert!(mask.captures("/user/list").unwrap().is_empty());
    assert!(mask.captures("/user/list/").is_none());
    assert!(mask.captures("/user/listing").is_none());
    assert!(mask.captures("/api/user/list").is_none());
}

#[test]
fn test_dot_in_literal_is_not_a_wildcard() {
    let mask = MaskPattern::compile("/feed.xml").unwrap();
    assert!(mask.is_match("/feed.xml"));
    assert!(!mask.is_match("/feedaxml"));
}

#[test]
fn test_default_param_stops_at_slash() {
    let mask = MaskPattern::compile("/user/{id}").unwrap();
    let params = mask.captures("/user/42").unwrap();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].0.as_ref(), "id");
    assert_eq!(params[0].1, "42");
    assert!(mask.captures("/user/42/edit").is_none());
    assert!(mask.captures("/user/").is_none());
}

#[test]
fn test_custom_pattern_param() {
    let mask = MaskPattern::compile(r"/user/{id:\d+}").unwrap();
    assert!(mask.is_match("/user/42"));
    assert!(!mask.is_match("/user/abc"));

    let mask = MaskPattern::compile("/static/{path:.+}").unwrap();
    let params = mask.captures("/static/css/site.css").unwrap();
    assert_eq!(params[0].1, "css/site.css");
}

#[test]
fn test_optional_segment() {
    let mask = MaskPattern::compile("/user[/{id}]").unwrap();
    assert!(mask.captures("/user").unwrap().is_empty());
    let params = mask.captures("/user/42").unwrap();
    assert_eq!(params[0].1, "42");
    assert!(!mask.is_match("/user/"));
}

#[test]
fn test_nested_optional_segments() {
    let mask = MaskPattern::compile("/archive[/{year}[/{month}]]").unwrap();
    assert!(mask.is_match("/archive"));
    assert_eq!(mask.captures("/archive/2024").unwrap().len(), 1);
    let params = mask.captures("/archive/2024/05").unwrap();
    assert_eq!(params[0].1, "2024");
    assert_eq!(params[1].1, "05");
    // month without year is not expressible
    assert!(!mask.is_match("/archive//05"));
}

#[test]
fn test_bracketed_mask_without_params_is_literal() {
    let mut table = RouteTable::new();
    table
        .register(MethodFlag::Get, "/list[/all]", |_, _| {})
        .unwrap();
    let mask = table.groups()[0].routes()[0].mask();
    assert!(mask.is_literal());
    assert!(mask.is_match("/list[/all]"));
    assert!(!mask.is_match("/list"));
    assert!(!mask.is_match("/list/all"));

    assert!(matches!(
        table.register(MethodFlag::Get, "/list[/all", |_, _| {}),
        Err(RegisterError::MalformedMask(
            MalformedMaskError::UnbalancedBrackets { .. }
        ))
    ));
}
