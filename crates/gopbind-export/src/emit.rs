//! Registration emission.
//!
//! The [`Emitter`] collects adapters and registration entries symbol by
//! symbol, enforces unique binding names, tracks which imports the emitted
//! text uses, and finally assembles the artifact text:
//!
//! ```text
//! package geo
//!
//! import (...)
//!
//! <adapters and helpers>
//!
//! var I = gop.NewGoPackage("example.com/geo")
//!
//! func init() {
//!     I.RegisterConsts(...)
//!     I.RegisterVars(...)
//!     I.RegisterTypes(...)
//!     I.RegisterFuncs(...)
//!     I.RegisterFuncvs(...)
//! }
//! ```

use std::collections::HashSet;
use std::fmt;

use gopbind_core::TypeRenderer;

use crate::adapter::AdapterPlan;
use crate::classify::{ConstSymbol, FuncSymbol, TypeSymbol, VarSymbol};
use crate::config::ExportConfig;
use crate::constructor::ZeroConstructor;
use crate::error::SkipReason;
use crate::mapper::{map_const, map_type, TypeMapping};
use crate::report::{ExportReport, SymbolKind};

/// Binding names claimed so far in one export run.
#[derive(Debug, Default)]
pub struct BindingTable {
    claimed: HashSet<String>,
}

impl BindingTable {
    /// Claim a binding name. A name can be claimed once; later claims are rejected.
    pub fn claim(&mut self, name: &str) -> Result<(), SkipReason> {
        if self.claimed.insert(name.to_string()) {
            Ok(())
        } else {
            Err(SkipReason::AmbiguousBinding {
                name: name.to_string(),
            })
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.claimed.contains(name)
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}

/// Registration group, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Consts,
    Vars,
    Types,
    Funcs,
    Funcvs,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Consts,
        Section::Vars,
        Section::Types,
        Section::Funcs,
        Section::Funcvs,
    ];

    /// Name of the bulk registration call, e.g. `RegisterConsts`.
    pub fn register_call(&self) -> &'static str {
        match self {
            Section::Consts => "RegisterConsts",
            Section::Vars => "RegisterVars",
            Section::Types => "RegisterTypes",
            Section::Funcs => "RegisterFuncs",
            Section::Funcvs => "RegisterFuncvs",
        }
    }

    fn index(&self) -> usize {
        match self {
            Section::Consts => 0,
            Section::Vars => 1,
            Section::Types => 2,
            Section::Funcs => 3,
            Section::Funcvs => 4,
        }
    }
}

/// Which optional imports the emitted text references.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportUse {
    pub package: bool,
    pub reflect: bool,
    pub spec: bool,
}

struct Entry {
    key: String,
    text: String,
}

/// Accumulates the generated declarations and registrations of one package.
pub struct Emitter<'a> {
    config: &'a ExportConfig,
    renderer: &'a TypeRenderer,
    bindings: BindingTable,
    sections: [Vec<Entry>; 5],
    adapters: Vec<String>,
    adapter_names: HashSet<String>,
    imports: ImportUse,
    report: ExportReport,
}

impl<'a> Emitter<'a> {
    pub fn new(config: &'a ExportConfig, renderer: &'a TypeRenderer) -> Self {
        Self {
            config,
            renderer,
            bindings: BindingTable::default(),
            sections: Default::default(),
            adapters: Vec::new(),
            adapter_names: HashSet::new(),
            imports: ImportUse::default(),
            report: ExportReport::default(),
        }
    }

    pub fn report_mut(&mut self) -> &mut ExportReport {
        &mut self.report
    }

    pub fn imports(&self) -> ImportUse {
        self.imports
    }

    fn qualified(&self, name: &str) -> String {
        format!("{}.{name}", self.renderer.package_name())
    }

    /// Reserve a Go identifier for an adapter. Distinct methods can flatten
    /// to the same `execm<Type><Method>` name, so later ones get a suffix.
    fn adapter_name(&mut self, base: &str) -> String {
        let mut name = base.to_string();
        let mut n = 2;
        while !self.adapter_names.insert(name.clone()) {
            name = format!("{base}_{n}");
            n += 1;
        }
        if name != base {
            tracing::debug!(adapter = base, renamed = %name, "adapter name already taken");
        }
        name
    }

    fn push(&mut self, section: Section, key: &str, text: String) {
        self.sections[section.index()].push(Entry {
            key: key.to_string(),
            text,
        });
        let report = &mut self.report;
        match section {
            Section::Consts => report.consts += 1,
            Section::Vars => report.vars += 1,
            Section::Types => report.types += 1,
            Section::Funcs => report.funcs += 1,
            Section::Funcvs => report.funcvs += 1,
        }
    }

    /// Register a constant, or record why it was skipped.
    pub fn add_const(&mut self, c: &ConstSymbol) {
        let mapping = match map_const(c.literal_kind, &c.literal_text, &c.ty) {
            Ok(mapping) => mapping,
            Err(reason) => return self.report.skip(&c.name, SymbolKind::Const, reason),
        };
        if let Err(reason) = self.bindings.claim(&c.name) {
            return self.report.skip(&c.name, SymbolKind::Const, reason);
        }
        let kind = mapping.kind.render(self.config);
        let value = mapping.range.wrap(&self.qualified(&c.name));
        let text = format!("{}.Const({:?}, {kind}, {value})", self.config.instance, c.name);

        self.imports.package = true;
        if mapping.kind.uses_reflect() {
            self.imports.reflect = true;
        } else {
            self.imports.spec = true;
        }
        self.push(Section::Consts, &c.name, text);
    }

    /// Register a variable by address.
    pub fn add_var(&mut self, v: &VarSymbol) {
        if let Err(reason) = self.bindings.claim(&v.name) {
            return self.report.skip(&v.name, SymbolKind::Var, reason);
        }
        let text = format!(
            "{}.Var({:?}, &{})",
            self.config.instance,
            v.name,
            self.qualified(&v.name)
        );
        self.imports.package = true;
        self.push(Section::Vars, &v.name, text);
    }

    /// Register a type. Returns its mapping when the type was emitted.
    pub fn add_type(&mut self, t: &TypeSymbol) -> Option<TypeMapping> {
        let mapping = map_type(&t.underlying);
        let text = match mapping {
            TypeMapping::Unsupported(shape) => {
                self.report
                    .skip(&t.name, SymbolKind::Type, SkipReason::UnmappedType { shape });
                return None;
            }
            TypeMapping::Kind(tag) => {
                format!("{}.Type({:?}, {})", self.config.instance, t.name, tag.render(self.config))
            }
            TypeMapping::Handle => format!(
                "{}.Rtype(reflect.TypeOf((*{})(nil)).Elem())",
                self.config.instance,
                self.qualified(&t.name)
            ),
        };
        if let Err(reason) = self.bindings.claim(&t.name) {
            self.report.skip(&t.name, SymbolKind::Type, reason);
            return None;
        }
        match mapping {
            TypeMapping::Handle => {
                self.imports.package = true;
                self.imports.reflect = true;
            }
            _ => self.imports.spec = true,
        }
        self.push(Section::Types, &t.name, text);
        Some(mapping)
    }

    /// Register a function or method with its synthesized adapter.
    pub fn add_func(&mut self, f: &FuncSymbol, plan: &AdapterPlan) {
        let binding = f.binding_name();
        if let Err(reason) = self.bindings.claim(&binding) {
            return self.report.skip(&f.display_name(), SymbolKind::Func, reason);
        }
        let (call, section) = if plan.is_variadic() {
            ("Funcv", Section::Funcvs)
        } else {
            ("Func", Section::Funcs)
        };
        let exec_name = self.adapter_name(&plan.exec_name);
        let text = format!(
            "{}.{call}({binding:?}, {}, {exec_name})",
            self.config.instance,
            f.call_name(self.renderer.package_name()),
        );
        let adapter = if exec_name == plan.exec_name {
            plan.render(self.config)
        } else {
            AdapterPlan {
                exec_name,
                ..plan.clone()
            }
            .render(self.config)
        };
        self.adapters.push(adapter);
        self.imports.package = true;
        self.push(section, &f.display_name(), text);
    }

    /// Register a zero-value constructor with its helper and adapter.
    pub fn add_constructor(&mut self, ctor: &ZeroConstructor) {
        if let Err(reason) = self.bindings.claim(&ctor.binding) {
            return self.report.skip(&ctor.binding, SymbolKind::Func, reason);
        }
        let exec_name = self.adapter_name(&ctor.plan.exec_name);
        let text = format!(
            "{}.Func({:?}, {}, {exec_name})",
            self.config.instance, ctor.binding, ctor.helper
        );
        let plan = AdapterPlan {
            exec_name,
            ..ctor.plan.clone()
        };
        self.adapters.push(ctor.helper_source());
        self.adapters.push(plan.render(self.config));
        self.imports.package = true;
        self.push(Section::Funcs, &ctor.binding, text);
    }

    /// Assemble the artifact text and hand back the report.
    pub fn finish(mut self) -> (String, ExportReport) {
        for section in &mut self.sections {
            section.sort_by(|a, b| a.key.cmp(&b.key));
        }
        let text = ArtifactText { emitter: &self }.to_string();
        (text, self.report)
    }
}

struct ArtifactText<'e, 'a> {
    emitter: &'e Emitter<'a>,
}

impl fmt::Display for ArtifactText<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = self.emitter;
        let config = e.config;
        let path = e.renderer.package_path();

        writeln!(f, "package {}", e.renderer.package_name())?;
        writeln!(f)?;
        writeln!(f, "import (")?;
        if e.imports.package {
            writeln!(f, "\t{path:?}")?;
        }
        if e.imports.reflect {
            writeln!(f, "\t\"reflect\"")?;
        }
        if e.imports.package || e.imports.reflect {
            writeln!(f)?;
        }
        writeln!(f, "\t{}", config.runtime_import_line())?;
        if e.imports.spec {
            writeln!(f, "\t{}", config.spec_import_line())?;
        }
        writeln!(f, ")")?;

        for adapter in &e.adapters {
            writeln!(f)?;
            writeln!(f, "{adapter}")?;
        }

        writeln!(f)?;
        writeln!(f, "// {} is a Go package instance.", config.instance)?;
        writeln!(
            f,
            "var {} = {}.NewGoPackage({path:?})",
            config.instance, config.runtime_alias
        )?;

        if e.sections.iter().all(Vec::is_empty) {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(f, "func init() {{")?;
        for section in Section::ALL {
            let entries = &e.sections[section.index()];
            if entries.is_empty() {
                continue;
            }
            writeln!(f, "\t{}.{}(", config.instance, section.register_call())?;
            for entry in entries {
                writeln!(f, "\t\t{},", entry.text)?;
            }
            writeln!(f, "\t)")?;
        }
        writeln!(f, "}}")
    }
}
