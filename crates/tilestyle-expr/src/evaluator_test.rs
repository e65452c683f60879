use super::{evaluate, evaluate_color, EvalError};
use crate::builder::compile_tree;
use crate::color::Color;
use crate::pool::ScratchPool;
use crate::subject::{FeatureProperties, Subject};
use crate::value::Value;
use glam::{Vec2, Vec3, Vec4};

fn eval_with(source: &str, subject: &dyn Subject) -> Result<Value, EvalError> {
    let node = compile_tree(source).expect("compile");
    let mut pool = ScratchPool::new();
    evaluate(&node, &mut pool, subject)
}

fn eval(source: &str) -> Value {
    eval_with(source, &FeatureProperties::new()).expect("eval")
}

struct PanickingSubject;

impl Subject for PanickingSubject {
    fn property(&self, name: &str) -> Option<Value> {
        panic!("property {name} must not be read");
    }
}

#[test]
fn evaluates_arithmetic_and_precedence() {
    assert_eq!(eval("5"), Value::Number(5.0));
    assert_eq!(eval("1 + 2 * 3"), Value::Number(7.0));
    assert_eq!(eval("(1 + 2) * 3"), Value::Number(9.0));
    assert_eq!(eval("7 % 4"), Value::Number(3.0));
    assert_eq!(eval("-(2)"), Value::Number(-2.0));
    assert_eq!(eval("+'3'"), Value::Number(3.0));
}

#[test]
fn compares_feature_properties() {
    let tall = FeatureProperties::new().with_property("Height", 2.0);
    let short = FeatureProperties::new().with_property("Height", 0.0);
    let missing = FeatureProperties::new();
    assert_eq!(eval_with("${Height} > 1", &tall), Ok(Value::Bool(true)));
    assert_eq!(eval_with("${Height} > 1", &short), Ok(Value::Bool(false)));
    assert_eq!(eval_with("${Height} > 1", &missing), Ok(Value::Bool(false)));
    assert_eq!(eval_with("${Height}", &missing), Ok(Value::Undefined));
}

#[test]
fn plus_concatenates_strings() {
    assert_eq!(eval("'a' + 1"), Value::from("a1"));
    assert_eq!(eval("1 + '2'"), Value::from("12"));
    assert_eq!(eval("true + 1"), Value::Number(2.0));
    assert!(matches!(eval("undefined + 1"), Value::Number(n) if n.is_nan()));
}

#[test]
fn equality_follows_loose_and_strict_rules() {
    assert_eq!(eval("5 == '5'"), Value::Bool(true));
    assert_eq!(eval("5 === '5'"), Value::Bool(false));
    assert_eq!(eval("null == undefined"), Value::Bool(true));
    assert_eq!(eval("null === undefined"), Value::Bool(false));
    assert_eq!(eval("true == 1"), Value::Bool(true));
    assert_eq!(eval("NaN == NaN"), Value::Bool(false));
    assert_eq!(eval("color('red') === rgb(255, 0, 0)"), Value::Bool(true));
    assert_eq!(eval("vec2(1, 2) != vec2(1, 3)"), Value::Bool(true));
    assert_eq!(eval("regExp('a') === regExp('a')"), Value::Bool(false));
}

#[test]
fn relational_operators_compare_strings_lexicographically() {
    assert_eq!(eval("'apple' < 'banana'"), Value::Bool(true));
    assert_eq!(eval("'10' < '9'"), Value::Bool(true));
    assert_eq!(eval("'10' < 9"), Value::Bool(false));
    assert_eq!(eval("NaN <= NaN"), Value::Bool(false));
}

#[test]
fn logical_operators_short_circuit() {
    assert_eq!(
        eval_with("false && (${Height} === 1)", &PanickingSubject),
        Ok(Value::Bool(false))
    );
    assert_eq!(
        eval_with("true || (${Height} === 1)", &PanickingSubject),
        Ok(Value::Bool(true))
    );
    assert_eq!(eval("false && (1/0 === 1/0)"), Value::Bool(false));
    assert_eq!(eval("true && false"), Value::Bool(false));
}

#[test]
fn logical_operators_require_booleans() {
    let err = eval_with("1 && true", &FeatureProperties::new()).expect_err("must fail");
    assert_eq!(
        err,
        EvalError::UndefinedOperation {
            operator: "&&",
            found: "number",
        }
    );
    assert!(err.to_string().starts_with("Operation is undefined"));

    let err = eval_with("false || 'yes'", &FeatureProperties::new()).expect_err("must fail");
    assert!(matches!(err, EvalError::UndefinedOperation { found: "string", .. }));
}

#[test]
fn conditional_and_not_use_truthiness() {
    assert_eq!(eval("'' ? 1 : 2"), Value::Number(2.0));
    assert_eq!(eval("'x' ? 1 : 2"), Value::Number(1.0));
    assert_eq!(eval("!0"), Value::Bool(true));
    assert_eq!(eval("!color()"), Value::Bool(false));
}

#[test]
fn fuzzy_regex_match_tests_either_side() {
    let feature = FeatureProperties::new().with_property("Name", "Chesterfield");
    assert_eq!(
        eval_with("${Name} =~ regExp('^Chest')", &feature),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        eval_with("regExp('^West') =~ ${Name}", &feature),
        Ok(Value::Bool(false))
    );
    assert_eq!(
        eval_with("${Name} !~ regExp('^West')", &feature),
        Ok(Value::Bool(true))
    );
    assert_eq!(eval("'a' =~ 'a'"), Value::Bool(false));
    assert_eq!(eval("'a' !~ 'b'"), Value::Bool(false));
}

#[test]
fn regex_methods_evaluate() {
    let feature = FeatureProperties::new().with_property("County", "Chesterfield");
    assert_eq!(
        eval_with("regExp('^Chest').test(${County})", &feature),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        eval_with("regExp('^Ches(\\w+)').exec(${County})", &feature),
        Ok(Value::from("terfield"))
    );
    assert_eq!(eval("regExp('x').exec('abc')"), Value::Null);
    assert_eq!(eval("regExp('a(b)?').exec('a')"), Value::Undefined);
    assert_eq!(eval("regExp('a', 'i').toString()"), Value::from("/a/i"));
}

#[test]
fn dynamic_regex_compiles_per_evaluation() {
    let feature = FeatureProperties::new().with_property("Pattern", "^to");
    assert_eq!(
        eval_with("regExp(${Pattern}).test('tower')", &feature),
        Ok(Value::Bool(true))
    );

    let broken = FeatureProperties::new().with_property("Pattern", "(");
    let err = eval_with("regExp(${Pattern})", &broken).expect_err("must fail");
    assert!(matches!(err, EvalError::InvalidRegex(_)));
}

#[test]
fn builds_colors() {
    let subject = FeatureProperties::new();
    let node = compile_tree("rgba(255, 0, 0, 0.5)").expect("compile");
    let mut pool = ScratchPool::new();
    assert_eq!(
        evaluate_color(&node, &mut pool, &subject),
        Ok(Color::new(1.0, 0.0, 0.0, 0.5))
    );

    assert_eq!(eval("color()"), Value::Color(Color::WHITE));
    assert_eq!(eval("color('#00ff00', 0.25)"), Value::Color(Color::new(0.0, 1.0, 0.0, 0.25)));
    assert_eq!(eval("rgb(255, 255, 255)"), Value::Color(Color::WHITE));
    assert_eq!(eval("hsl(0, 0, 1)"), Value::Color(Color::WHITE));
    assert_eq!(eval("hsla(0, 0, 0, 0.5)"), Value::Color(Color::new(0.0, 0.0, 0.0, 0.5)));
    assert_eq!(eval("hsl(0, 1, 0.5) === color('red')"), Value::Bool(true));
    assert_eq!(eval("hsl(0, 1, 0.5)"), Value::Color(Color::new(1.0, 0.0, 0.0, 1.0)));
}

#[test]
fn invalid_css_color_is_an_error() {
    let err = eval_with("color('nope')", &FeatureProperties::new()).expect_err("must fail");
    assert_eq!(err, EvalError::InvalidColor("nope".to_string()));
}

#[test]
fn evaluate_color_rejects_other_types() {
    let node = compile_tree("1").expect("compile");
    let mut pool = ScratchPool::new();
    let err = evaluate_color(&node, &mut pool, &FeatureProperties::new()).expect_err("must fail");
    assert!(matches!(err, EvalError::TypeMismatch(_)));
}

#[test]
fn color_arithmetic_is_componentwise() {
    assert_eq!(
        eval("color('red') + color('blue')"),
        Value::Color(Color::new(1.0, 0.0, 1.0, 2.0))
    );
    assert_eq!(
        eval("2 * rgba(51, 51, 51, 0.5)"),
        Value::Color(Color::new(0.4, 0.4, 0.4, 1.0))
    );
    assert_eq!(
        eval("color() / 2"),
        Value::Color(Color::new(0.5, 0.5, 0.5, 0.5))
    );
    assert_eq!(eval("+color()"), Value::Color(Color::WHITE));
}

#[test]
fn vectors_flatten_and_broadcast() {
    assert_eq!(eval("vec3(2)"), Value::Vec3(Vec3::splat(2.0)));
    assert_eq!(eval("vec4(vec2(1, 2), 3, 4)"), Value::Vec4(Vec4::new(1.0, 2.0, 3.0, 4.0)));
    assert_eq!(eval("vec4(vec3(1, 2, 3), 4)"), Value::Vec4(Vec4::new(1.0, 2.0, 3.0, 4.0)));
    assert_eq!(eval("vec2(vec4(1, 2, 3, 4))"), Value::Vec2(Vec2::new(1.0, 2.0)));
    assert_eq!(eval("vec3(vec4(5, 6, 7, 8))"), Value::Vec3(Vec3::new(5.0, 6.0, 7.0)));
}

#[test]
fn vector_component_count_is_checked() {
    let err = eval_with("vec2(vec4(1), 1)", &FeatureProperties::new()).expect_err("must fail");
    assert!(matches!(err, EvalError::VectorArity { function: "vec2", .. }));
    assert!(err.to_string().contains("too many arguments"));

    let err = eval_with("vec4(1, 2)", &FeatureProperties::new()).expect_err("must fail");
    assert!(err.to_string().contains("not enough components"));

    let err = eval_with("vec2('a', 1)", &FeatureProperties::new()).expect_err("must fail");
    assert!(matches!(err, EvalError::TypeMismatch(_)));
}

#[test]
fn vector_arithmetic() {
    assert_eq!(eval("vec2(1, 2) + vec2(3, 4)"), Value::Vec2(Vec2::new(4.0, 6.0)));
    assert_eq!(eval("vec3(1, 2, 3) * 2"), Value::Vec3(Vec3::new(2.0, 4.0, 6.0)));
    assert_eq!(eval("vec2(5, 7) % vec2(2, 4)"), Value::Vec2(Vec2::new(1.0, 3.0)));
    assert_eq!(eval("-vec2(1, -2)"), Value::Vec2(Vec2::new(-1.0, 2.0)));
    assert!(matches!(eval("-color()"), Value::Number(n) if n.is_nan()));
}

#[test]
fn member_access_on_colors_vectors_and_strings() {
    assert_eq!(eval("color('red').red"), Value::Number(1.0));
    assert_eq!(eval("rgba(0, 0, 0, 0.5).w"), Value::Number(0.5));
    assert_eq!(eval("color('blue')[2]"), Value::Number(1.0));
    assert_eq!(eval("vec3(1, 2, 3).z"), Value::Number(3.0));
    assert_eq!(eval("vec2(1, 2)[1]"), Value::Number(2.0));
    assert_eq!(eval("vec2(1, 2)[3]"), Value::Undefined);
    assert_eq!(eval("vec2(1, 2).z"), Value::Undefined);
    assert_eq!(eval("'abc'.length"), Value::Number(3.0));
    assert_eq!(eval("'abc'[1]"), Value::from("b"));
    assert_eq!(eval("[1, 2, 3][2]"), Value::Number(3.0));
    assert_eq!(eval("undefined.x"), Value::Undefined);
}

#[test]
fn feature_member_reads_subject_properties() {
    let feature = FeatureProperties::new().with_property("Height", 12.0);
    assert_eq!(eval_with("feature.Height", &feature), Ok(Value::Number(12.0)));
    assert_eq!(eval_with("feature['Height']", &feature), Ok(Value::Number(12.0)));
    assert_eq!(eval_with("feature.Width", &feature), Ok(Value::Undefined));
}

#[test]
fn template_strings_interpolate_properties() {
    let feature = FeatureProperties::new()
        .with_property("Name", "tower")
        .with_property("Floors", 3.0)
        .with_property("Note", Value::Null);
    assert_eq!(
        eval_with("'${Name} has ${Floors} floors${Note}${Missing}'", &feature),
        Ok(Value::from("tower has 3 floors"))
    );
}

#[test]
fn conversions_follow_native_semantics() {
    assert_eq!(eval("Boolean('')"), Value::Bool(false));
    assert_eq!(eval("Boolean('false')"), Value::Bool(true));
    assert_eq!(eval("Number(' 12 ')"), Value::Number(12.0));
    assert_eq!(eval("Number(true)"), Value::Number(1.0));
    assert_eq!(eval("String(1.5)"), Value::from("1.5"));
    assert_eq!(eval("String(vec2(1, 2))"), Value::from("(1, 2)"));
    assert_eq!(eval("isNaN('abc')"), Value::Bool(true));
    assert_eq!(eval("isFinite('12')"), Value::Bool(true));
    assert_eq!(eval("vec2(1, 2).toString()"), Value::from("(1, 2)"));
}

#[test]
fn to_string_rejects_plain_values() {
    let err = eval_with("'abc'.toString()", &FeatureProperties::new()).expect_err("must fail");
    assert!(matches!(err, EvalError::TypeMismatch(_)));
}

#[test]
fn math_functions() {
    assert_eq!(eval("abs(-3)"), Value::Number(3.0));
    assert_eq!(eval("sqrt(16)"), Value::Number(4.0));
    assert_eq!(eval("pow(2, 3)"), Value::Number(8.0));
    assert_eq!(eval("max(1, 5)"), Value::Number(5.0));
    assert_eq!(eval("clamp(5, 0, 2)"), Value::Number(2.0));
    assert_eq!(eval("mix(0, 10, 0.5)"), Value::Number(5.0));
    let Value::Number(degrees) = eval("degrees(PI)") else {
        panic!("expected a number");
    };
    assert!((degrees - 180.0).abs() < 1e-9);
}

#[test]
fn class_predicates_delegate_to_subject() {
    let mut feature = FeatureProperties::new().with_class("door");
    feature.add_class("building");
    assert_eq!(eval_with("isExactClass('door')", &feature), Ok(Value::Bool(true)));
    assert_eq!(eval_with("isExactClass('building')", &feature), Ok(Value::Bool(false)));
    assert_eq!(eval_with("isClass('building')", &feature), Ok(Value::Bool(true)));
    assert_eq!(eval_with("getExactClassName()", &feature), Ok(Value::from("door")));
}

#[test]
fn tileset_time_reads_subject_clock() {
    let feature = FeatureProperties::new().with_time_since_load(4.5);
    assert_eq!(eval_with("TILES3D_TILESET_TIME * 2", &feature), Ok(Value::Number(9.0)));
}

#[test]
fn arrays_evaluate_elements() {
    assert_eq!(
        eval("[1, 'a', null]"),
        Value::Array(vec![Value::Number(1.0), Value::from("a"), Value::Null])
    );
}

#[test]
fn pool_is_reused_between_evaluations() {
    let node = compile_tree("vec2(1, 2) + vec2(3, 4)").expect("compile");
    let subject = FeatureProperties::new();
    let mut pool = ScratchPool::new();
    evaluate(&node, &mut pool, &subject).expect("eval");
    let warmed = pool.capacity();
    for _ in 0..5 {
        evaluate(&node, &mut pool, &subject).expect("eval");
    }
    assert_eq!(pool.capacity(), warmed);
    assert_eq!(warmed.vec2s, 3);
}
