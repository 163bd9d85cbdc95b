use lgr::format::render;
use lgr::{Arg, ToArg};
use std::fmt;
use std::net::Ipv4Addr;

fn render_str(format: &str, args: &[Arg<'_>]) -> String {
    let mut out = Vec::new();
    render(&mut out, format, args);
    String::from_utf8(out).expect("renderer must emit UTF-8")
}

struct Broken;

impl fmt::Display for Broken {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Err(fmt::Error)
    }
}

#[test]
fn test_literal_text_and_percent() {
    assert_eq!(render_str("plain text", &[]), "plain text");
    assert_eq!(render_str("héllo %s", &[Arg::Str("wörld")]), "héllo wörld");
    assert_eq!(render_str("%d%%", &[Arg::Int(50)]), "50%");
}

#[test]
fn test_integer_verbs() {
    assert_eq!(
        render_str("%x %X %#x %o %#o %b %O", &[
            Arg::Int(255),
            Arg::Int(255),
            Arg::Int(255),
            Arg::Int(8),
            Arg::Int(8),
            Arg::Int(5),
            Arg::Int(8),
        ]),
        "ff FF 0xff 10 010 101 0o10"
    );
    assert_eq!(render_str("%x", &[Arg::Int(-255)]), "-ff");
    assert_eq!(render_str("%d", &[Arg::Uint(u64::MAX)]), "18446744073709551615");
    assert_eq!(render_str("%d", &[Arg::Int(i64::MIN)]), "-9223372036854775808");
}

#[test]
fn test_integer_flags_width_and_precision() {
    assert_eq!(
        render_str("%5d|%-5d|%05d", &[Arg::Int(42), Arg::Int(42), Arg::Int(42)]),
        "   42|42   |00042"
    );
    assert_eq!(render_str("%+d % d", &[Arg::Int(5), Arg::Int(5)]), "+5  5");
    assert_eq!(render_str("%.3d", &[Arg::Int(7)]), "007");
    assert_eq!(render_str("%6.3d|", &[Arg::Int(7)]), "   007|");
}

#[test]
fn test_star_width_and_precision() {
    assert_eq!(
        render_str("%*d|%-*d|", &[Arg::Int(4), Arg::Int(7), Arg::Int(3), Arg::Int(7)]),
        "   7|7  |"
    );
    assert_eq!(render_str("%.*f", &[Arg::Int(2), Arg::Float(1.23456)]), "1.23");
    assert_eq!(render_str("%*d", &[Arg::Str("x"), Arg::Int(1)]), "%!(BADWIDTH)1");
}

#[test]
fn test_oversized_precision_is_rejected() {
    assert_eq!(render_str("%.70000f", &[Arg::Float(1.0)]), "%!(BADPREC)1.000000");
    assert_eq!(render_str("%.70000e", &[Arg::Float(1.0)]), "%!(BADPREC)1.000000e+00");
    assert_eq!(render_str("%.70000g", &[Arg::Float(1.0)]), "%!(BADPREC)1");
    assert_eq!(
        render_str("%.*f", &[Arg::Int(70000), Arg::Float(1.0)]),
        "%!(BADPREC)1.000000"
    );
    assert_eq!(render_str("%.*d", &[Arg::Int(-1), Arg::Int(5)]), "5");

    // the largest accepted precision still renders in full
    assert_eq!(render_str("%.65535f", &[Arg::Float(1.0)]).len(), 65537);
    assert_eq!(render_str("%.65535g", &[Arg::Float(0.0001)]), "0.0001");
}

#[test]
fn test_char_verbs() {
    assert_eq!(
        render_str("%c %U %#U", &[Arg::Char('A'), Arg::Char('A'), Arg::Char('A')]),
        "A U+0041 U+0041 'A'"
    );
    assert_eq!(render_str("%c", &[Arg::Int(0x263A)]), "☺");
    assert_eq!(render_str("%q", &[Arg::Char('x')]), "'x'");
}

#[test]
fn test_string_verbs() {
    assert_eq!(render_str("%q", &[Arg::Str("hi\n")]), "\"hi\\n\"");
    assert_eq!(render_str("%x", &[Arg::Str("hi")]), "6869");
    assert_eq!(render_str("% x", &[Arg::Str("hi")]), "68 69");
    assert_eq!(render_str("%#X", &[Arg::Str("hi")]), "0X6869");
    assert_eq!(render_str("%.2s", &[Arg::Str("hello")]), "he");
    assert_eq!(render_str("%-6s|", &[Arg::Str("ab")]), "ab    |");
    assert_eq!(render_str("%6s|", &[Arg::Str("héllo")]), " héllo|");
}

#[test]
fn test_float_verbs() {
    assert_eq!(render_str("%f", &[Arg::Float(10.10)]), "10.100000");
    assert_eq!(render_str("%.2f", &[Arg::Float(1.23456)]), "1.23");
    assert_eq!(render_str("%8.3f|", &[Arg::Float(1.23456)]), "   1.235|");
    assert_eq!(render_str("%08.3f", &[Arg::Float(-1.23456)]), "-001.235");
    assert_eq!(render_str("%e", &[Arg::Float(1234.5678)]), "1.234568e+03");
    assert_eq!(render_str("%E", &[Arg::Float(0.000123)]), "1.230000E-04");
    assert_eq!(render_str("%.3g", &[Arg::Float(1234.0)]), "1.23e+03");
    assert_eq!(render_str("%g", &[Arg::Float(100000.0)]), "100000");
}

#[test]
fn test_float_default_form() {
    assert_eq!(render_str("%v", &[Arg::Float(10.10)]), "10.1");
    assert_eq!(render_str("%v", &[Arg::Float(0.0)]), "0");
    assert_eq!(render_str("%v", &[Arg::Float(0.0001)]), "0.0001");
    assert_eq!(render_str("%v", &[Arg::Float(0.00001)]), "1e-05");
    assert_eq!(render_str("%v", &[Arg::Float(1234567.0)]), "1.234567e+06");
    assert_eq!(render_str("%v", &[0.1f32.to_arg()]), "0.1");
}

#[test]
fn test_float_specials() {
    assert_eq!(
        render_str("%f %v %5.1f", &[
            Arg::Float(f64::NAN),
            Arg::Float(f64::INFINITY),
            Arg::Float(f64::NEG_INFINITY),
        ]),
        "NaN +Inf  -Inf"
    );
}

#[test]
fn test_bool_type_and_debug_form() {
    assert_eq!(render_str("%t %v", &[Arg::Bool(false), Arg::Bool(true)]), "false true");
    assert_eq!(
        render_str("%T %T %T", &[Arg::Str("s"), Arg::Int(1), Arg::Float(2.5)]),
        "&str i64 f64"
    );
    assert_eq!(render_str("%#v", &[Arg::Str("s")]), "\"s\"");
}

#[test]
fn test_display_and_debug_values() {
    let ip = Ipv4Addr::new(127, 0, 0, 1);
    assert_eq!(render_str("%s", &[Arg::display(&ip)]), "127.0.0.1");
    assert_eq!(render_str("%10s|", &[Arg::display(&ip)]), " 127.0.0.1|");
    assert_eq!(render_str("%q", &[Arg::display(&ip)]), "\"127.0.0.1\"");

    let list = vec![1, 2];
    assert_eq!(render_str("%v", &[Arg::debug(&list)]), "[1, 2]");
}

#[test]
fn test_to_arg_conversions() {
    let owned = String::from("owned");
    let (small, negative, flag, letter) = (7u8, -7i32, true, 'c');
    let args = [
        owned.to_arg(),
        "lit".to_arg(),
        small.to_arg(),
        negative.to_arg(),
        flag.to_arg(),
        letter.to_arg(),
    ];
    assert_eq!(render_str("%s %s %d %d %t %c", &args), "owned lit 7 -7 true c");
    assert_eq!(render_str("%T %T", &[small.to_arg(), negative.to_arg()]), "u64 i64");
}

#[test]
fn test_error_markers() {
    assert_eq!(render_str("%d", &[]), "%!d(MISSING)");
    assert_eq!(render_str("%d", &[Arg::Bool(true)]), "%!d(bool=true)");
    assert_eq!(render_str("%z", &[Arg::Int(3)]), "%!z(i64=3)");
    assert_eq!(render_str("end %", &[]), "end %!(NOVERB)");
    assert_eq!(
        render_str("x", &[Arg::Int(1), Arg::Str("y")]),
        "x%!(EXTRA i64=1, &str=y)"
    );
    assert_eq!(render_str("[%s]", &[Arg::display(&Broken)]), "[%!s(ERROR)]");
}
