//! Declarative macros for the command parsing and output tests.
//!
//! Each command's `cli_tests.rs` and `output.rs` declare their cases with
//! these instead of writing the parse/format boilerplate by hand.

/// Parse `xuml_schema <command> <args..>` and unwrap the expected
/// `Command` variant, panicking on anything else.
#[macro_export]
macro_rules! parse_command {
    ($variant:ident, $cmd:literal $(, $arg:literal)*) => {
        match Args::try_parse_from(["xuml_schema", $cmd $(, $arg)*])
            .unwrap()
            .command
        {
            $crate::commands::Command::$variant(cmd) => cmd,
            other => panic!("Expected {} command, got {:?}", stringify!($variant), other),
        }
    };
}

/// Check the defaults a command gets when only its required args are given.
#[macro_export]
macro_rules! cli_defaults_test {
    (
        command: $cmd:literal,
        variant: $variant:ident,
        required_args: [$($req_arg:literal),*],
        defaults: {
            $($def_field:ident : $def_expected:expr),* $(,)?
        } $(,)?
    ) => {
        #[rstest]
        fn test_defaults() {
            let cmd = $crate::parse_command!($variant, $cmd $(, $req_arg)*);
            $(
                assert_eq!(cmd.$def_field, $def_expected, "default of {}", stringify!($def_field));
            )*
        }
    };
}

/// One option, one field.
#[macro_export]
macro_rules! cli_option_test {
    (
        command: $cmd:literal,
        variant: $variant:ident,
        test_name: $test_name:ident,
        args: [$($arg:literal),+],
        field: $field:ident,
        expected: $expected:expr $(,)?
    ) => {
        #[rstest]
        fn $test_name() {
            let cmd = $crate::parse_command!($variant, $cmd $(, $arg)+);
            assert_eq!(cmd.$field, $expected, "value of {}", stringify!($field));
        }
    };
}

/// Generate a test that verifies a command requires a specific argument.
///
/// # Example
///
/// ```ignore
/// cli_required_arg_test! {
///     command: "build",
///     test_name: test_requires_package,
///     required_arg: "<PACKAGE>",
/// }
/// ```
#[macro_export]
macro_rules! cli_required_arg_test {
    (
        command: $cmd:literal,
        test_name: $test_name:ident,
        required_arg: $arg:literal $(,)?
    ) => {
        #[rstest]
        fn $test_name() {
            let err = Args::try_parse_from(["xuml_schema", $cmd]).unwrap_err();
            assert!(err.to_string().contains($arg), "{} not reported in: {}", $arg, err);
        }
    };
}

/// Generate a test that verifies parsing fails with specific invalid args.
///
/// # Example
///
/// ```ignore
/// cli_error_test! {
///     command: "names",
///     test_name: test_rejects_two_patterns,
///     args: ["R*", "C*"],
/// }
/// ```
#[macro_export]
macro_rules! cli_error_test {
    (
        command: $cmd:literal,
        test_name: $test_name:ident,
        args: [$($arg:literal),+] $(,)?
    ) => {
        #[rstest]
        fn $test_name() {
            assert!(Args::try_parse_from(["xuml_schema", $cmd $(, $arg)+]).is_err());
        }
    };
}

/// Exact table rendering of an rstest fixture.
///
/// # Example
/// ```ignore
/// output_table_test! {
///     test_name: test_to_table_empty,
///     fixture: empty_result,
///     fixture_type: NamesResult,
///     expected: EMPTY_TABLE_OUTPUT,
/// }
/// ```
#[macro_export]
macro_rules! output_table_test {
    (
        test_name: $test_name:ident,
        fixture: $fixture:ident,
        fixture_type: $fixture_type:ty,
        expected: $expected:expr $(,)?
    ) => {
        #[rstest]
        fn $test_name($fixture: $fixture_type) {
            use crate::output::Outputable;
            assert_eq!($fixture.to_table(), $expected);
        }
    };
}

/// JSON rendering parses and carries the listed top-level fields.
///
/// # Example
/// ```ignore
/// output_json_test! {
///     test_name: test_format_json,
///     fixture: single_result,
///     fixture_type: NamesResult,
///     assertions: {
///         "kind": "relations",
///     },
/// }
/// ```
#[macro_export]
macro_rules! output_json_test {
    (
        test_name: $test_name:ident,
        fixture: $fixture:ident,
        fixture_type: $fixture_type:ty,
        assertions: { $($field:literal : $expected:expr),* $(,)? } $(,)?
    ) => {
        #[rstest]
        fn $test_name($fixture: $fixture_type) {
            use crate::output::{Outputable, OutputFormat};
            let parsed: serde_json::Value =
                serde_json::from_str(&$fixture.format(OutputFormat::Json)).unwrap();
            $(
                assert_eq!(parsed[$field], $expected, "JSON field {}", $field);
            )*
        }
    };
}

/// Toon rendering contains every listed fragment.
///
/// # Example
/// ```ignore
/// output_toon_test! {
///     test_name: test_format_toon,
///     fixture: single_result,
///     fixture_type: NamesResult,
///     contains: ["kind: relations", "names["],
/// }
/// ```
#[macro_export]
macro_rules! output_toon_test {
    (
        test_name: $test_name:ident,
        fixture: $fixture:ident,
        fixture_type: $fixture_type:ty,
        contains: [$($needle:literal),* $(,)?] $(,)?
    ) => {
        #[rstest]
        fn $test_name($fixture: $fixture_type) {
            use crate::output::{Outputable, OutputFormat};
            let output = $fixture.format(OutputFormat::Toon);
            $(
                assert!(output.contains($needle), "missing {:?} in:\n{}", $needle, output);
            )*
        }
    };
}
