//! The generated code document.
//!
//! A [`GeneratedCodeDocument`] is the structural model of one generated file:
//! the implementation class, the factory function and the configuration DSL
//! class. All type text is pre-rendered, so a language backend only lays the
//! pieces out.
//!
//! The three parts share one [`TypeParameterList`] and one set of configure
//! method names. [`GeneratedCodeDocument::verify_consistency`] checks both.

use std::collections::BTreeSet;

use eyre::{Result, bail};
use fakegen_ir::GenericPattern;
use serde::Serialize;

use crate::{generation::ImportCollector, generics::ScopingStrategy};

/// A rendered type parameter list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TypeParameterList {
    /// Header form with inline bounds: `<K : Comparable<K>, V>`, or empty.
    pub declaration: String,
    /// Argument form: `<K, V>`, or empty.
    pub arguments: String,
    /// `where` clause body (`K : A, K : B`) when a parameter has several bounds.
    pub where_clause: Option<String>,
}

impl TypeParameterList {
    pub fn is_empty(&self) -> bool {
        self.declaration.is_empty()
    }

    /// ` where K : A, K : B`, or an empty string.
    pub fn where_suffix(&self) -> String {
        self.where_clause
            .as_deref()
            .map(|clause| format!(" where {clause}"))
            .unwrap_or_default()
    }
}

/// Everything generated for one declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedCodeDocument {
    pub package: String,
    /// The source declaration name as written (`Outer.Inner`).
    pub declaration: String,
    /// Output file name without extension.
    pub file_stem: String,
    pub pattern: GenericPattern,
    /// Symbols referenced by the generated code, before default-import filtering.
    pub imports: ImportCollector,
    pub implementation: ImplementationClass,
    pub factory: FactoryFunction,
    pub config: ConfigDslClass,
    /// How each behavior was scoped and defaulted, in member order.
    pub summary: Vec<BehaviorSummary>,
}

impl GeneratedCodeDocument {
    /// Fully-qualified name of the source declaration.
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.declaration.clone()
        } else {
            format!("{}.{}", self.package, self.declaration)
        }
    }

    /// Check that the implementation class, factory and DSL class agree.
    ///
    /// A mismatch is a generator defect: the emitted code would not compile.
    pub fn verify_consistency(&self) -> Result<()> {
        let class = &self.implementation.type_parameters;
        if *class != self.factory.type_parameters {
            bail!(
                "{}: factory type parameters `{}` differ from class `{}`",
                self.declaration,
                self.factory.type_parameters.declaration,
                class.declaration
            );
        }
        if *class != self.config.type_parameters {
            bail!(
                "{}: DSL type parameters `{}` differ from class `{}`",
                self.declaration,
                self.config.type_parameters.declaration,
                class.declaration
            );
        }

        let configured: BTreeSet<&str> = self
            .implementation
            .configure_methods()
            .map(|c| c.name.as_str())
            .collect();
        let exposed: BTreeSet<&str> = self
            .config
            .methods
            .iter()
            .map(|m| m.configure.as_str())
            .collect();
        if configured != exposed {
            let missing: Vec<_> = configured.symmetric_difference(&exposed).collect();
            bail!(
                "{}: configure methods and DSL methods disagree on {:?}",
                self.declaration,
                missing
            );
        }
        Ok(())
    }
}

/// How one configurable behavior was generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BehaviorSummary {
    /// Member name, `setM` for a property setter.
    pub behavior: String,
    pub scoping: ScopingStrategy,
    /// Default strategy label, or `super` when unset storage falls back to
    /// the superclass.
    pub default: String,
}

/// The `Fake<Name>Impl` class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImplementationClass {
    pub name: String,
    pub type_parameters: TypeParameterList,
    /// `Name<T>` for interfaces, `Name<T>()` for classes.
    pub supertype: String,
    /// Grouped by kind: storage, counters, overrides, configure methods.
    pub members: Vec<ImplementationMember>,
}

impl ImplementationClass {
    pub fn configure_methods(&self) -> impl Iterator<Item = &ConfigureMethod> {
        self.members.iter().filter_map(|m| match m {
            ImplementationMember::Configure(c) => Some(c),
            _ => None,
        })
    }

    pub fn overrides(&self) -> impl Iterator<Item = &OverrideMember> {
        self.members.iter().filter_map(|m| match m {
            ImplementationMember::Override(o) => Some(o),
            _ => None,
        })
    }
}

/// One member of the implementation class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ImplementationMember {
    BehaviorStorage(BehaviorStorage),
    CallCounter(CallCounter),
    Override(OverrideMember),
    Configure(ConfigureMethod),
}

/// `private var mBehavior: <type> = <initializer>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BehaviorStorage {
    pub name: String,
    /// Function type of the stored behavior, `(...)?` when it may be unset.
    pub ty: String,
    pub initializer: String,
}

/// A private `MutableStateFlow<Int>` exposed as a read-only `StateFlow<Int>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallCounter {
    pub backing: String,
    pub name: String,
}

/// `internal fun configureM(behavior: <type>) { mBehavior = behavior }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigureMethod {
    pub name: String,
    pub parameter_type: String,
    pub storage: String,
}

/// An overriding member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "member", rename_all = "kebab-case")]
pub enum OverrideMember {
    Function(OverrideFunction),
    Property(OverrideProperty),
}

impl OverrideMember {
    pub fn name(&self) -> &str {
        match self {
            Self::Function(f) => &f.name,
            Self::Property(p) => &p.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverrideFunction {
    /// Escaped member name.
    pub name: String,
    /// `suspend`, `operator`, `infix`, in that order.
    pub modifiers: Vec<String>,
    pub type_parameters: TypeParameterList,
    /// Extension receiver type.
    pub receiver: Option<String>,
    pub parameters: Vec<OverrideParameter>,
    pub return_type: String,
    /// Whether the body contains unchecked casts.
    pub unchecked_cast: bool,
    pub counter: String,
    pub delegation: Delegation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverrideParameter {
    pub name: String,
    /// Element type for a vararg parameter.
    pub ty: String,
    pub vararg: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverrideProperty {
    pub name: String,
    pub ty: String,
    pub mutable: bool,
    pub getter: Accessor,
    pub setter: Option<Accessor>,
}

/// The counter and delegation of a property accessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Accessor {
    pub counter: String,
    pub delegation: Delegation,
}

/// How an override forwards to its behavior storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delegation {
    pub storage: String,
    /// Call arguments, already cast where storage is erased.
    pub arguments: Vec<String>,
    /// Type the stored result is cast back to.
    pub return_cast: Option<String>,
    /// Super call used while the storage is unset (open class members).
    pub super_call: Option<String>,
}

impl Delegation {
    /// `storage(args)` with the return cast applied.
    pub fn invocation(&self, callee: &str) -> String {
        let call = format!("{}({})", callee, self.arguments.join(", "));
        match &self.return_cast {
            Some(ty) => format!("{call} as {ty}"),
            None => call,
        }
    }
}

/// `fun <T> fakeName(configure: FakeNameConfig<T>.() -> Unit = {}): Name<T>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactoryFunction {
    pub name: String,
    pub type_parameters: TypeParameterList,
    /// `FakeNameConfig<T>`
    pub config_type: String,
    /// `FakeNameImpl<T>`
    pub implementation_type: String,
    /// `Name<T>`
    pub return_type: String,
}

/// The `Fake<Name>Config` class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigDslClass {
    pub name: String,
    pub type_parameters: TypeParameterList,
    /// `FakeNameImpl<T>`
    pub implementation_type: String,
    pub methods: Vec<DslMethod>,
}

/// A builder-style configuration method taking the member's full signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DslMethod {
    pub name: String,
    pub type_parameters: TypeParameterList,
    pub parameter_type: String,
    /// Implementation method this forwards to.
    pub configure: String,
    /// Storage type the behavior is cast to when storage is erased.
    pub cast: Option<String>,
}
