//! Adapter synthesis.
//!
//! An adapter translates the host runtime's generic call convention (an
//! argument count plus a stack of dynamically typed values) into one
//! concrete native call. Synthesis first builds an [`AdapterPlan`], a
//! structured description of the argument conversions, call target and
//! result count, then renders it as Go source.

use std::fmt;

use gopbind_core::{BasicKind, TypeDescriptor, TypeRenderer};

use crate::classify::FuncSymbol;
use crate::config::ExportConfig;
use crate::error::SkipReason;
use crate::mapper::{check_value_type, numeric_conversion, Position};
use crate::signature::{analyze, ReceiverInfo};

/// Conversion of one fixed parameter's argument slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgConversion {
    /// `args[slot].(ty)`
    Assert { slot: usize, ty: String },
    /// `ty(args[slot].(basic))`, for named types over a differently named basic type.
    Convert {
        slot: usize,
        ty: String,
        basic: BasicKind,
    },
}

impl ArgConversion {
    pub fn slot(&self) -> usize {
        match self {
            ArgConversion::Assert { slot, .. } | ArgConversion::Convert { slot, .. } => *slot,
        }
    }

    fn expr(&self) -> String {
        match self {
            ArgConversion::Assert { slot, ty } => format!("args[{slot}].({ty})"),
            ArgConversion::Convert { slot, ty, basic } => format!("{ty}(args[{slot}].({basic}))"),
        }
    }
}

/// Handling of the trailing arguments of a variadic adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TailPlan {
    /// Empty-interface element: `args[from:]...` passed through unconverted.
    Forward { from: usize },
    /// Each trailing argument is asserted (and optionally converted) into a `[]elem`.
    Convert {
        from: usize,
        elem: String,
        basic: Option<BasicKind>,
    },
}

impl TailPlan {
    pub fn from(&self) -> usize {
        match self {
            TailPlan::Forward { from } | TailPlan::Convert { from, .. } => *from,
        }
    }
}

/// What the adapter calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallTarget {
    /// A package-level function, e.g. `geo.Add`.
    Direct(String),
    /// A method invoked on argument slot 0 asserted as `receiver`.
    Method { receiver: String, method: String },
}

/// Structured description of one adapter procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterPlan {
    pub exec_name: String,
    /// Go declaration of the wrapped function, emitted as a leading comment.
    pub comment: String,
    /// Argument slots before the variadic tail, receiver included.
    pub fixed_arity: usize,
    pub variadic: Option<TailPlan>,
    /// Parameter conversions. The receiver is not listed; it is always slot 0.
    pub args: Vec<ArgConversion>,
    pub call: CallTarget,
    pub results: usize,
}

impl AdapterPlan {
    pub fn is_variadic(&self) -> bool {
        self.variadic.is_some()
    }

    /// Number of stack slots the adapter consumes when invoked with `arity` arguments.
    pub fn consumed(&self, arity: usize) -> usize {
        if self.is_variadic() {
            arity
        } else {
            self.fixed_arity
        }
    }

    /// Number of arguments gathered into the variadic tail.
    pub fn tail_len(&self, arity: usize) -> usize {
        if self.is_variadic() {
            arity.saturating_sub(self.fixed_arity)
        } else {
            0
        }
    }

    pub fn display<'a>(&'a self, config: &'a ExportConfig) -> AdapterDisplay<'a> {
        AdapterDisplay { plan: self, config }
    }

    /// Render the adapter as Go source, comment line included.
    pub fn render(&self, config: &ExportConfig) -> String {
        self.display(config).to_string()
    }

    fn result_names(&self) -> Vec<String> {
        (0..self.results)
            .map(|i| if i == 0 { "ret".to_string() } else { format!("ret{i}") })
            .collect()
    }
}

/// Go source of an [`AdapterPlan`].
pub struct AdapterDisplay<'a> {
    plan: &'a AdapterPlan,
    config: &'a ExportConfig,
}

impl fmt::Display for AdapterDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.plan;
        writeln!(f, "// {}", plan.comment)?;

        let count = if plan.is_variadic() {
            "arity".to_string()
        } else {
            plan.fixed_arity.to_string()
        };
        let arity_param = if plan.is_variadic() { "arity" } else { "_" };
        writeln!(
            f,
            "func {}({arity_param} int, p {}) {{",
            plan.exec_name,
            self.config.context_type()
        )?;
        let fetches = plan.is_variadic() || plan.fixed_arity > 0;
        if fetches {
            writeln!(f, "\targs := p.GetArgs({count})")?;
        }

        let mut call_args: Vec<String> = plan.args.iter().map(ArgConversion::expr).collect();
        match &plan.variadic {
            Some(TailPlan::Forward { from }) => call_args.push(format!("args[{from}:]...")),
            Some(TailPlan::Convert { from, elem, basic }) => {
                let item = match basic {
                    Some(basic) => format!("{elem}(arg.({basic}))"),
                    None => format!("arg.({elem})"),
                };
                writeln!(f, "\tconv := func(args []interface{{}}) []{elem} {{")?;
                writeln!(f, "\t\tret := make([]{elem}, len(args))")?;
                writeln!(f, "\t\tfor i, arg := range args {{")?;
                writeln!(f, "\t\t\tret[i] = {item}")?;
                writeln!(f, "\t\t}}")?;
                writeln!(f, "\t\treturn ret")?;
                writeln!(f, "\t}}")?;
                call_args.push(format!("conv(args[{from}:])..."));
            }
            None => {}
        }

        let callee = match &plan.call {
            CallTarget::Direct(name) => name.clone(),
            CallTarget::Method { receiver, method } => format!("args[0].({receiver}).{method}"),
        };
        let rets = plan.result_names();
        write!(f, "\t")?;
        if !rets.is_empty() {
            write!(f, "{} := ", rets.join(", "))?;
        }
        writeln!(f, "{callee}({})", call_args.join(", "))?;

        if fetches || !rets.is_empty() {
            let mut packed = vec![count];
            packed.extend(rets);
            writeln!(f, "\tp.Ret({})", packed.join(", "))?;
        }
        write!(f, "}}")
    }
}

/// Build the adapter plan for an admitted function or method.
///
/// Fails with a [`SkipReason`] when a parameter or result type cannot be
/// carried across the host boundary.
pub fn synthesize(func: &FuncSymbol, renderer: &TypeRenderer) -> Result<AdapterPlan, SkipReason> {
    let sig = analyze(&func.signature);
    let render = |ty: &TypeDescriptor| renderer.render(ty);

    for (i, param) in func.signature.params.iter().enumerate() {
        check_value_type(&param.ty, Position::Param(i), &render)?;
    }
    for (i, ty) in sig.results.iter().enumerate() {
        check_value_type(ty, Position::Result(i), &render)?;
    }

    let pkg = renderer.package_name();
    let method = |receiver: String| CallTarget::Method {
        receiver,
        method: func.name.clone(),
    };
    let call = match &sig.receiver {
        ReceiverInfo::None => CallTarget::Direct(func.call_name(pkg)),
        ReceiverInfo::Value(name) => method(format!("{pkg}.{name}")),
        ReceiverInfo::Pointer(name) => method(format!("*{pkg}.{name}")),
    };

    let base = sig.arg_base();
    let args = sig
        .params
        .iter()
        .enumerate()
        .map(|(i, ty)| convert_arg(base + i, ty, renderer))
        .collect();

    let variadic = sig.tail.map(|elem| {
        let from = sig.fixed_arity();
        if is_any(elem) {
            TailPlan::Forward { from }
        } else {
            let elem_ty = renderer.render(elem);
            let basic = match elem {
                TypeDescriptor::Named(named) => numeric_conversion(named, &elem_ty),
                _ => None,
            };
            TailPlan::Convert {
                from,
                elem: elem_ty,
                basic,
            }
        }
    });

    Ok(AdapterPlan {
        exec_name: func.exec_name(),
        comment: renderer.func_decl(&func.name, &func.signature),
        fixed_arity: sig.fixed_arity(),
        variadic,
        args,
        call,
        results: sig.results.len(),
    })
}

fn convert_arg(slot: usize, ty: &TypeDescriptor, renderer: &TypeRenderer) -> ArgConversion {
    let rendered = renderer.render(ty);
    let basic = match ty {
        TypeDescriptor::Named(named) => numeric_conversion(named, &rendered),
        _ => None,
    };
    match basic {
        Some(basic) => ArgConversion::Convert {
            slot,
            ty: rendered,
            basic,
        },
        None => ArgConversion::Assert { slot, ty: rendered },
    }
}

fn is_any(ty: &TypeDescriptor) -> bool {
    match ty {
        TypeDescriptor::Named(named) if named.is_predeclared() && named.name == "any" => true,
        other => other.is_empty_interface(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gopbind_core::{Param, Signature};
    use pretty_assertions::assert_eq;

    const PKG: &str = "example.com/geo";

    fn renderer() -> TypeRenderer {
        TypeRenderer::new(PKG, "geo")
    }

    fn int() -> TypeDescriptor {
        TypeDescriptor::basic(BasicKind::Int)
    }

    fn add() -> FuncSymbol {
        FuncSymbol::free(
            "Add",
            Signature::new(
                vec![Param::new("a", int()), Param::new("b", int())],
                vec![Param::unnamed(int())],
            ),
        )
    }

    #[test]
    fn fixed_arity_adapter() {
        let plan = synthesize(&add(), &renderer()).unwrap();
        assert_eq!(plan.fixed_arity, 2);
        assert_eq!(plan.consumed(2), 2);
        assert_eq!(
            plan.render(&ExportConfig::default()),
            "// func geo.Add(a int, b int) int\n\
             func execAdd(_ int, p *gop.Context) {\n\
             \targs := p.GetArgs(2)\n\
             \tret := geo.Add(args[0].(int), args[1].(int))\n\
             \tp.Ret(2, ret)\n\
             }"
        );
    }

    #[test]
    fn no_args_no_results_skips_stack_traffic() {
        let func = FuncSymbol::free("Reset", Signature::default());
        let text = synthesize(&func, &renderer())
            .unwrap()
            .render(&ExportConfig::default());
        assert!(!text.contains("GetArgs"));
        assert!(!text.contains("p.Ret"));
        assert!(text.contains("\tgeo.Reset()\n"));
    }

    #[test]
    fn results_without_args_still_report() {
        let func = FuncSymbol::free(
            "Now",
            Signature::new(Vec::new(), vec![Param::unnamed(int()), Param::unnamed(int())]),
        );
        let text = synthesize(&func, &renderer())
            .unwrap()
            .render(&ExportConfig::default());
        assert!(text.contains("\tret, ret1 := geo.Now()\n"));
        assert!(text.contains("\tp.Ret(0, ret, ret1)\n"));
    }

    #[test]
    fn pointer_method_calls_through_slot_zero() {
        let point = TypeDescriptor::named_ref(PKG, "Point");
        let func = FuncSymbol {
            name: "Scale".to_string(),
            signature: Signature::new(vec![Param::new("k", int())], Vec::new())
                .with_receiver("p", TypeDescriptor::pointer(point)),
            receiver: Some("Point".to_string()),
        };
        let plan = synthesize(&func, &renderer()).unwrap();
        assert_eq!(
            plan.call,
            CallTarget::Method {
                receiver: "*geo.Point".to_string(),
                method: "Scale".to_string()
            }
        );
        assert_eq!(plan.fixed_arity, 2);
        let text = plan.render(&ExportConfig::default());
        assert!(text.starts_with("// func (p *geo.Point) Scale(k int)\nfunc execmPointScale(_ int"));
        assert!(text.contains("\targs[0].(*geo.Point).Scale(args[1].(int))\n"));
        assert!(text.contains("\tp.Ret(2)\n"));
    }

    #[test]
    fn named_basic_params_convert() {
        let duration = TypeDescriptor::named("time", "Duration", TypeDescriptor::basic(BasicKind::Int64));
        let func = FuncSymbol::free(
            "Sleep",
            Signature::new(vec![Param::new("d", duration)], Vec::new()),
        );
        let plan = synthesize(&func, &renderer()).unwrap();
        assert_eq!(
            plan.args,
            [ArgConversion::Convert {
                slot: 0,
                ty: "time.Duration".to_string(),
                basic: BasicKind::Int64
            }]
        );
        assert!(plan
            .render(&ExportConfig::default())
            .contains("geo.Sleep(time.Duration(args[0].(int64)))"));
    }

    #[test]
    fn variadic_any_tail_forwards() {
        let func = FuncSymbol::free(
            "Println",
            Signature::new(
                vec![Param::new("a", TypeDescriptor::slice(TypeDescriptor::any()))],
                vec![Param::new("n", int()), Param::new("err", TypeDescriptor::named_ref("", "error"))],
            )
            .with_variadic(),
        );
        let plan = synthesize(&func, &renderer()).unwrap();
        assert_eq!(plan.variadic, Some(TailPlan::Forward { from: 0 }));
        let text = plan.render(&ExportConfig::default());
        assert!(text.contains("func execPrintln(arity int, p *gop.Context) {\n\targs := p.GetArgs(arity)\n"));
        assert!(text.contains("\tret, ret1 := geo.Println(args[0:]...)\n\tp.Ret(arity, ret, ret1)\n"));
        assert!(!text.contains("conv"));
    }

    #[test]
    fn variadic_typed_tail_converts() {
        let func = FuncSymbol::free(
            "Sum",
            Signature::new(
                vec![
                    Param::new("base", int()),
                    Param::new("xs", TypeDescriptor::slice(int())),
                ],
                vec![Param::unnamed(int())],
            )
            .with_variadic(),
        );
        let plan = synthesize(&func, &renderer()).unwrap();
        assert_eq!(plan.tail_len(5), 4);
        assert_eq!(plan.consumed(5), 5);
        assert_eq!(
            plan.render(&ExportConfig::default()),
            "// func geo.Sum(base int, xs ...int) int\n\
             func execSum(arity int, p *gop.Context) {\n\
             \targs := p.GetArgs(arity)\n\
             \tconv := func(args []interface{}) []int {\n\
             \t\tret := make([]int, len(args))\n\
             \t\tfor i, arg := range args {\n\
             \t\t\tret[i] = arg.(int)\n\
             \t\t}\n\
             \t\treturn ret\n\
             \t}\n\
             \tret := geo.Sum(args[0].(int), conv(args[1:])...)\n\
             \tp.Ret(arity, ret)\n\
             }"
        );
    }

    #[test]
    fn rejects_hidden_params_and_channels() {
        let hidden = FuncSymbol::free(
            "Load",
            Signature::new(
                vec![Param::new("s", TypeDescriptor::pointer(TypeDescriptor::named_ref(PKG, "state")))],
                Vec::new(),
            ),
        );
        assert!(matches!(
            synthesize(&hidden, &renderer()),
            Err(SkipReason::UnexportedParam { index: 0, .. })
        ));

        let chan = TypeDescriptor::Chan {
            dir: Default::default(),
            elem: Box::new(int()),
        };
        let ticks = FuncSymbol::free("Ticks", Signature::new(Vec::new(), vec![Param::unnamed(chan)]));
        let err = synthesize(&ticks, &renderer()).unwrap_err();
        assert_eq!(err.to_string(), "unsupported result 0 type chan int (chan)");
    }

    #[test]
    fn custom_runtime_alias() {
        let config = ExportConfig {
            runtime_alias: "qlang".to_string(),
            ..ExportConfig::default()
        };
        let text = synthesize(&add(), &renderer()).unwrap().render(&config);
        assert!(text.contains("p *qlang.Context"));
    }
}
