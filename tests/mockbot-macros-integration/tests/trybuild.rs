//! trybuild compile-time tests for mockbot_macros

#[test]
fn trybuild_mockbot_macros() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/mockable_ok.rs");
    t.pass("tests/trybuild/injectable_ok.rs");
}
