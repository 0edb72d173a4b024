//! End-to-end export of snapshot fixtures.

use gopbind_core::{
    BasicKind, Declaration, JsonFileLoader, LiteralKind, ModuleSnapshot, Param, Signature,
    SnapshotLoader, TypeDescriptor,
};
use gopbind_export::{
    classify, export_from, export_package, AcceptAll, ExportConfig, ExportError, NameFilter,
    SkipReason,
};
use pretty_assertions::assert_eq;

fn fixtures() -> JsonFileLoader {
    JsonFileLoader::with_root(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"))
}

fn int() -> TypeDescriptor {
    TypeDescriptor::basic(BasicKind::Int)
}

const GEO_EXPORTS: &str = r#"package geo

import (
	"example.com/geo"
	"reflect"

	"github.com/qiniu/goplus/gop"
	qspec "github.com/qiniu/goplus/exec.spec"
)

// func geo.Add(a int, b int) int
func execAdd(_ int, p *gop.Context) {
	args := p.GetArgs(2)
	ret := geo.Add(args[0].(int), args[1].(int))
	p.Ret(2, ret)
}

// func (p geo.Point) Len() int
func execmPointLen(_ int, p *gop.Context) {
	args := p.GetArgs(1)
	ret := args[0].(geo.Point).Len()
	p.Ret(1, ret)
}

// func (p *geo.Point) Scale(k int)
func execmPointScale(_ int, p *gop.Context) {
	args := p.GetArgs(2)
	args[0].(*geo.Point).Scale(args[1].(int))
	p.Ret(2)
}

func newPoint() *geo.Point {
	return new(geo.Point)
}

// func newPoint() *geo.Point
func execNewPoint(_ int, p *gop.Context) {
	ret := newPoint()
	p.Ret(0, ret)
}

// func geo.Sum(xs ...int) int
func execSum(arity int, p *gop.Context) {
	args := p.GetArgs(arity)
	conv := func(args []interface{}) []int {
		ret := make([]int, len(args))
		for i, arg := range args {
			ret[i] = arg.(int)
		}
		return ret
	}
	ret := geo.Sum(conv(args[0:])...)
	p.Ret(arity, ret)
}

// I is a Go package instance.
var I = gop.NewGoPackage("example.com/geo")

func init() {
	I.RegisterConsts(
		I.Const("Pi", qspec.ConstUnboundFloat, geo.Pi),
	)
	I.RegisterTypes(
		I.Type("Celsius", qspec.TyFloat64),
		I.Rtype(reflect.TypeOf((*geo.Point)(nil)).Elem()),
	)
	I.RegisterFuncs(
		I.Func("Add", geo.Add, execAdd),
		I.Func("NewPoint", newPoint, execNewPoint),
		I.Func("(Point).Len", (geo.Point).Len, execmPointLen),
		I.Func("(*Point).Scale", (*geo.Point).Scale, execmPointScale),
	)
	I.RegisterFuncvs(
		I.Funcv("Sum", geo.Sum, execSum),
	)
}
"#;

#[test]
fn exports_geo_fixture() {
    let artifact = export_from(
        &fixtures(),
        "geo",
        &ExportConfig::default(),
        &AcceptAll,
    )
    .unwrap();

    assert_eq!(artifact.package_path, "example.com/geo");
    assert_eq!(artifact.file_name, "exports.go");
    assert_eq!(
        artifact.relative_path(),
        std::path::Path::new("example.com/geo/exports.go")
    );
    assert_eq!(artifact.text, GEO_EXPORTS);

    let report = &artifact.report;
    assert_eq!(report.consts, 1);
    assert_eq!(report.vars, 0);
    assert_eq!(report.types, 2);
    assert_eq!(report.funcs, 4);
    assert_eq!(report.funcvs, 1);

    let skipped: Vec<String> = report.skipped.iter().map(ToString::to_string).collect();
    assert_eq!(
        skipped,
        [
            "skip func Open, param 0 type is internal geo.state",
            "skip func Ticks, unsupported result 0 type <-chan int (chan)",
        ]
    );
}

#[test]
fn untyped_float_literal_reaches_registration() {
    let snapshot = fixtures().load("geo").unwrap();
    let classified = classify(&snapshot, &AcceptAll);
    let pi = &classified.consts[0];
    assert_eq!(pi.name, "Pi");
    assert_eq!(pi.literal_kind, LiteralKind::Float);
    assert_eq!(pi.literal_text, "3.14159");
    assert_eq!(pi.ty, TypeDescriptor::basic(BasicKind::UntypedFloat));

    let artifact = export_package(&snapshot, &ExportConfig::default(), &AcceptAll).unwrap();
    assert!(artifact
        .text
        .contains("\t\tI.Const(\"Pi\", qspec.ConstUnboundFloat, geo.Pi),\n"));
}

#[test]
fn filter_limits_symbols_but_not_constructor_detection() {
    let filter = NameFilter::from_patterns(["Point*", "Celsius"]);
    let artifact =
        export_from(&fixtures(), "geo", &ExportConfig::default(), &filter).unwrap();

    assert!(!artifact.text.contains("RegisterConsts"));
    assert!(!artifact.text.contains("I.Func(\"Add\""));
    assert!(artifact.text.contains("I.Func(\"(*Point).Scale\""));
    assert!(artifact.text.contains("I.Func(\"NewPoint\", newPoint, execNewPoint)"));
    assert!(artifact.report.skipped.is_empty());
}

#[test]
fn disabled_constructors() {
    let config = ExportConfig {
        zero_constructors: false,
        ..ExportConfig::default()
    };
    let artifact = export_from(&fixtures(), "geo", &config, &AcceptAll).unwrap();
    assert!(!artifact.text.contains("newPoint"));
    assert_eq!(artifact.report.funcs, 3);
}

#[test]
fn existing_constructor_suppresses_synthesis() {
    let point = TypeDescriptor::named_ref("example.com/geo", "Point");
    let snap = ModuleSnapshot::new(
        "example.com/geo",
        "geo",
        vec![
            Declaration::type_name("Point", TypeDescriptor::Struct { fields: Vec::new() }),
            Declaration::func(
                "NewPointAt",
                Signature::new(
                    vec![Param::new("x", int()), Param::new("y", int())],
                    vec![Param::unnamed(TypeDescriptor::pointer(point))],
                ),
            ),
        ],
    );
    let artifact = export_package(&snap, &ExportConfig::default(), &AcceptAll).unwrap();
    assert!(!artifact.text.contains("func newPoint()"));
    assert!(artifact
        .text
        .contains("\tret := geo.NewPointAt(args[0].(int), args[1].(int))\n"));
}

#[test]
fn colliding_binding_rejects_later_in_emission_order() {
    let snap = ModuleSnapshot::new(
        "example.com/geo",
        "geo",
        vec![
            Declaration::func("Max", Signature::new(Vec::new(), vec![Param::unnamed(int())])),
            Declaration::constant(
                "Max",
                LiteralKind::Int,
                "10",
                TypeDescriptor::basic(BasicKind::UntypedInt),
            ),
        ],
    );
    let artifact = export_package(&snap, &ExportConfig::default(), &AcceptAll).unwrap();

    assert!(artifact
        .text
        .contains("I.Const(\"Max\", qspec.ConstUnboundInt, geo.Max)"));
    assert!(!artifact.text.contains("execMax"));
    assert_eq!(artifact.report.funcs, 0);
    assert_eq!(
        artifact.report.skipped[0].reason,
        SkipReason::AmbiguousBinding {
            name: "Max".to_string()
        }
    );
}

#[test]
fn vars_only_package() {
    let snap = ModuleSnapshot::new(
        "example.com/conf",
        "conf",
        vec![
            Declaration::var("Verbose", TypeDescriptor::basic(BasicKind::Bool)),
            Declaration::var("hidden", int()),
        ],
    );
    let artifact = export_package(&snap, &ExportConfig::default(), &AcceptAll).unwrap();
    assert_eq!(
        artifact.text,
        "package conf\n\nimport (\n\t\"example.com/conf\"\n\n\t\"github.com/qiniu/goplus/gop\"\n)\n\n\
         // I is a Go package instance.\n\
         var I = gop.NewGoPackage(\"example.com/conf\")\n\n\
         func init() {\n\
         \tI.RegisterVars(\n\
         \t\tI.Var(\"Verbose\", &conf.Verbose),\n\
         \t)\n\
         }\n"
    );
}

#[test]
fn missing_snapshot_is_a_load_error() {
    let err = export_from(&fixtures(), "nope", &ExportConfig::default(), &AcceptAll).unwrap_err();
    assert!(matches!(err, ExportError::Load(_)));
}
