//! Conformance tests for text values and string operations
//!
//! Each test mirrors a group of assertions a script makes against the
//! string type: comparison, concatenation, indexing, slicing and the
//! derived operations.

use tessera_runtime::string_ops::{
    ends_with, join, join_value, replace, split, starts_with, strip,
};
use tessera_runtime::{ArgumentList, Function, LazySequence, ParameterSpec, Scope, Text, Value};

fn t(s: &str) -> Text {
    Text::from(s)
}

fn texts(parts: &[&str]) -> Vec<Text> {
    parts.iter().map(|p| t(p)).collect()
}

#[test]
fn test_comparison_and_concatenation() {
    assert_eq!(t("testing"), &t("test") + &t("ing"));
    assert_ne!(t("testing"), &t("test") + &t("ing2"));
    assert!(t("testing") < &t("test") + &t("ing2"));
    assert!(t("testing5") > &t("test") + &t("ing1"));

    assert_eq!(&t("abc") + &t("def"), "abcdef");
    assert_eq!((&t("abc") * 3).unwrap(), "abcabcabc");
}

#[test]
fn test_length_and_equality() {
    let a = t("");
    let b = t("test");
    let c = t("test");
    assert_eq!(a.len(), 0);
    assert_eq!(b.len(), 4);
    assert_eq!(b, c);
}

#[test]
fn test_indexing_and_slicing() {
    let s = t("football");
    let q = t("abcd");
    let r = t("zoo");
    let long = t("this is string example....wow!!!");

    assert_eq!(s.index(0).unwrap(), "f");
    assert_eq!(s.slice(Some(1), Some(4), None).unwrap(), "oot");
    assert_eq!(s.slice(None, Some(-1), None).unwrap(), "footbal");
    assert_eq!(s.slice(None, Some(10), None).unwrap(), "football");
    assert_eq!(s.index(-3).unwrap(), "a");
    assert_eq!(long.slice(Some(-5), None, None).unwrap(), "ow!!!");
    assert_eq!(
        long.slice(Some(3), Some(-3), None).unwrap(),
        "s is string example....wow"
    );
    assert!(s > q);
    assert!(s < r);
}

#[test]
fn test_replace_and_anchors() {
    let s = t("football");
    let long = t("this is string example....wow!!!");
    assert_eq!(replace(&s, &t("foo"), &t("ball")), "balltball");
    assert!(starts_with(&s, &t("f")));
    assert!(!ends_with(&s, &t("o")));
    assert!(starts_with(&long, &t("this")));
}

#[test]
fn test_split() {
    assert_eq!(
        split(&t("this is string example....wow!!!"), &t("w")).unwrap(),
        texts(&["this is string example....", "o", "!!!"])
    );
    assert_eq!(split(&t("a,b,c"), &t(",")).unwrap(), texts(&["a", "b", "c"]));
    assert_eq!(split(&t("a,"), &t(",")).unwrap(), texts(&["a", ""]));
    assert_eq!(
        split(&t("foo!!bar!!baz"), &t("!!")).unwrap(),
        texts(&["foo", "bar", "baz"])
    );
}

#[test]
fn test_strip() {
    let stars = t("*****this is **string** example....wow!!!*****");
    let digits = t("123abcrunoob321");
    assert_eq!(
        strip(&stars, Some(&t("*"))),
        "this is **string** example....wow!!!"
    );
    assert_eq!(strip(&digits, Some(&t("12"))), "3abcrunoob3");
    assert_eq!(strip(&t(" asd\n  asd \n"), None), "asd\n  asd");
}

#[test]
fn test_join_sequences_and_generators() {
    let seq: Vec<Value> = ["r", "u", "n", "o", "o", "b"]
        .iter()
        .map(|s| Value::str(s))
        .collect();
    assert_eq!(join(&t("-"), seq.clone()).unwrap(), "r-u-n-o-o-b");
    assert_eq!(join(&t(""), seq).unwrap(), "runoob");

    // def f(): for i in range(5): yield str(i)
    let generator = LazySequence::unfold(0i64, |i| {
        if *i >= 5 {
            return None;
        }
        let item = Value::Str(Value::Int(*i).to_string().into());
        *i += 1;
        Some(item)
    });
    assert_eq!(join(&t("|"), generator).unwrap(), "0|1|2|3|4");
}

#[test]
fn test_join_variadic_tuple() {
    // def test(*seq): return "-".join(seq)
    let spec = ParameterSpec::builder("test").variadic("seq").build().unwrap();
    let test = Function::new(spec, |env| {
        let seq = env.get("seq").cloned().unwrap_or(Value::None);
        Ok(Value::Str(join_value(&Text::from("-"), &seq)?))
    });
    let args = ["r", "u", "n", "o", "o", "b"]
        .iter()
        .fold(ArgumentList::new(), |args, s| args.positional(*s));
    assert_eq!(test.call(&args).unwrap(), Value::str("r-u-n-o-o-b"));
}

#[test]
fn test_str_of_int_and_non_ascii_text() {
    assert_eq!(Value::Int(6).to_string(), "6");
    let name = t("测试");
    assert_eq!(name, "测试");
    assert_eq!(name.len(), 2);

    let mut scope = Scope::new();
    scope.set("测试", "test");
    assert_eq!(scope.load("测试").unwrap(), Value::str("test"));
}

#[test]
fn test_concat_split_properties() {
    let samples = ["", "a", "football", "测试 text", "a,b,,c"];
    for a in samples {
        for b in samples {
            let (a, b) = (t(a), t(b));
            let joined = &a + &b;
            let cut = a.len() as i64;
            assert_eq!(joined.len(), a.len() + b.len());
            assert_eq!(joined.slice(None, Some(cut), None).unwrap(), a);
            assert_eq!(joined.slice(Some(cut), None, None).unwrap(), b);
        }
        let a = t(a);
        for n in 0..4 {
            assert_eq!(a.repeat(n).unwrap().len(), a.len() * n as usize);
        }
        if !a.is_empty() {
            assert_eq!(a.index(-1).unwrap(), a.index(a.len() as i64 - 1).unwrap());
        }
        for sep in [",", "a", "xy"] {
            let sep = t(sep);
            let parts: Vec<Value> = split(&a, &sep).unwrap().into_iter().map(Value::Str).collect();
            assert_eq!(join(&sep, parts).unwrap(), a);
        }
        let once = strip(&a, Some(&t("a,")));
        assert_eq!(strip(&once, Some(&t("a,"))), once);
    }
}
