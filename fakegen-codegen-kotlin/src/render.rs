//! Kotlin rendering of generated code documents.
//!
//! A [`KotlinRenderer`] lays out one [`GeneratedCodeDocument`] as a Kotlin
//! file body: package, imports, the implementation class, the factory
//! function and the configuration DSL class. Type text is already rendered
//! in the document; this module only decides placement.

use fakegen_codegen::{
    builder::{CodeBuilder, CodeFragment, Renderable},
    document::{
        BehaviorStorage, CallCounter, ConfigDslClass, ConfigureMethod, DslMethod, FactoryFunction,
        GeneratedCodeDocument, ImplementationClass, ImplementationMember, OverrideFunction,
        OverrideMember, OverrideProperty,
    },
};

use crate::{
    ast::{Class, Fun, Param},
    imports::import_statements,
};

const SUPPRESS_UNCHECKED: &str = "Suppress(\"UNCHECKED_CAST\")";
const UNIT: &str = "Unit";

/// Renders one document to Kotlin source, without the file header.
#[derive(Debug, Clone, Copy)]
pub struct KotlinRenderer<'d> {
    document: &'d GeneratedCodeDocument,
}

impl<'d> KotlinRenderer<'d> {
    pub fn new(document: &'d GeneratedCodeDocument) -> Self {
        Self { document }
    }

    pub fn render(&self) -> String {
        let document = self.document;
        let mut builder = CodeBuilder::kotlin();

        if !document.package.is_empty() {
            builder.push_line(&format!("package {}", document.package));
            builder.push_blank();
        }

        let imports = import_statements(&document.imports, &document.package);
        if !imports.is_empty() {
            for statement in &imports {
                builder.push_line(statement);
            }
            builder.push_blank();
        }

        builder.emit(&implementation_class(&document.implementation));
        builder.push_blank();
        builder.emit(&factory_function(&document.factory));
        builder.push_blank();
        builder.emit(&config_class(&document.config));
        builder.build()
    }
}

/// `class FakeNameImpl<T> : Name<T> { ... }`
fn implementation_class(class: &ImplementationClass) -> Class {
    let mut sections: Vec<Vec<CodeFragment>> = Vec::new();
    let mut storage = Vec::new();
    for member in &class.members {
        match member {
            ImplementationMember::BehaviorStorage(s) => storage.push(storage_line(s)),
            ImplementationMember::CallCounter(c) => sections.push(counter_lines(c)),
            ImplementationMember::Override(OverrideMember::Function(f)) => {
                sections.push(override_function(f).to_fragments())
            }
            ImplementationMember::Override(OverrideMember::Property(p)) => {
                sections.push(override_property(p))
            }
            ImplementationMember::Configure(c) => {
                sections.push(configure_method(c).to_fragments())
            }
        }
    }

    Class::new(&class.name)
        .type_parameters(&class.type_parameters.declaration)
        .supertype(&class.supertype)
        .where_suffix(class.type_parameters.where_suffix())
        .section(storage)
        .sections(sections)
}

fn storage_line(storage: &BehaviorStorage) -> CodeFragment {
    CodeFragment::line(format!(
        "private var {}: {} = {}",
        storage.name, storage.ty, storage.initializer
    ))
}

fn counter_lines(counter: &CallCounter) -> Vec<CodeFragment> {
    vec![
        CodeFragment::line(format!(
            "private val {} = MutableStateFlow(0)",
            counter.backing
        )),
        CodeFragment::line(format!(
            "val {}: StateFlow<Int> get() = {}",
            counter.name, counter.backing
        )),
    ]
}

fn increment(counter: &str) -> String {
    format!("{counter}.update {{ it + 1 }}")
}

/// A local name that shadows none of `taken`.
fn local_name(taken: &[&str]) -> String {
    let mut name = "configured".to_string();
    while taken.contains(&name.as_str()) {
        name.push('_');
    }
    name
}

fn override_function(function: &OverrideFunction) -> Fun {
    let delegation = &function.delegation;
    let returns_unit = function.return_type == UNIT;

    let mut fun = Fun::new(&function.name)
        .annotation_if(function.unchecked_cast, SUPPRESS_UNCHECKED)
        .modifier("override")
        .modifiers(&function.modifiers)
        .type_parameters(&function.type_parameters.declaration)
        .receiver(function.receiver.as_deref())
        .returns(&function.return_type)
        .where_suffix(function.type_parameters.where_suffix());
    for param in &function.parameters {
        fun = fun.param(Param::new(&param.name, &param.ty).vararg(param.vararg));
    }
    fun = fun.body_line(increment(&function.counter));

    match &delegation.super_call {
        Some(super_call) => {
            let taken: Vec<&str> = function.parameters.iter().map(|p| p.name.as_str()).collect();
            let local = local_name(&taken);
            let configured = delegation.invocation(&local);
            fun = fun.body_line(format!("val {local} = {}", delegation.storage));
            if returns_unit {
                fun.body_line(format!(
                    "if ({local} != null) {configured} else {super_call}"
                ))
            } else {
                fun.body_line(format!(
                    "return if ({local} != null) {configured} else {super_call}"
                ))
            }
        }
        None => {
            let call = delegation.invocation(&delegation.storage);
            if returns_unit {
                fun.body_line(call)
            } else {
                fun.body_line(format!("return {call}"))
            }
        }
    }
}

fn override_property(property: &OverrideProperty) -> Vec<CodeFragment> {
    let keyword = if property.mutable { "var" } else { "val" };
    let getter = &property.getter;
    let mut get = vec![CodeFragment::line(increment(&getter.counter))];
    match &getter.delegation.super_call {
        Some(super_call) => {
            get.push(CodeFragment::line(format!(
                "val configured = {}",
                getter.delegation.storage
            )));
            get.push(CodeFragment::line(format!(
                "return if (configured != null) {} else {super_call}",
                getter.delegation.invocation("configured")
            )));
        }
        None => get.push(CodeFragment::line(format!(
            "return {}",
            getter.delegation.invocation(&getter.delegation.storage)
        ))),
    }

    let mut accessors = vec![CodeFragment::braced("get() {", get)];
    if let Some(setter) = &property.setter {
        let mut set = vec![CodeFragment::line(increment(&setter.counter))];
        match &setter.delegation.super_call {
            Some(super_call) => {
                set.push(CodeFragment::line(format!(
                    "val configured = {}",
                    setter.delegation.storage
                )));
                set.push(CodeFragment::block(
                    "if (configured != null) {",
                    vec![CodeFragment::line(setter.delegation.invocation("configured"))],
                    None,
                ));
                set.push(CodeFragment::braced(
                    "} else {",
                    vec![CodeFragment::line(super_call.clone())],
                ));
            }
            None => set.push(CodeFragment::line(
                setter.delegation.invocation(&setter.delegation.storage),
            )),
        }
        accessors.push(CodeFragment::braced("set(value) {", set));
    }

    vec![CodeFragment::block(
        format!("override {keyword} {}: {}", property.name, property.ty),
        accessors,
        None,
    )]
}

fn configure_method(method: &ConfigureMethod) -> Fun {
    Fun::new(&method.name)
        .modifier("internal")
        .param(Param::new("behavior", &method.parameter_type))
        .body_line(format!("{} = behavior", method.storage))
}

/// `fun <T> fakeName(configure: FakeNameConfig<T>.() -> Unit = {}): Name<T> = ...`
fn factory_function(factory: &FactoryFunction) -> Fun {
    Fun::new(&factory.name)
        .type_parameters(&factory.type_parameters.declaration)
        .param(
            Param::new("configure", format!("{}.() -> Unit", factory.config_type)).default("{}"),
        )
        .returns(&factory.return_type)
        .where_suffix(factory.type_parameters.where_suffix())
        .expression(format!(
            "{}().apply {{ {}(this).configure() }}",
            factory.implementation_type, factory.config_type
        ))
}

fn config_class(config: &ConfigDslClass) -> Class {
    Class::new(&config.name)
        .type_parameters(&config.type_parameters.declaration)
        .constructor(format!("private val fake: {}", config.implementation_type))
        .where_suffix(config.type_parameters.where_suffix())
        .sections(
            config
                .methods
                .iter()
                .map(|m| dsl_method(m).to_fragments()),
        )
}

fn dsl_method(method: &DslMethod) -> Fun {
    let argument = match &method.cast {
        Some(ty) => format!("behavior as {ty}"),
        None => "behavior".to_string(),
    };
    Fun::new(&method.name)
        .annotation_if(method.cast.is_some(), SUPPRESS_UNCHECKED)
        .type_parameters(&method.type_parameters.declaration)
        .param(Param::new("behavior", &method.parameter_type))
        .where_suffix(method.type_parameters.where_suffix())
        .body_line(format!("fake.{}({argument})", method.configure))
}

#[cfg(test)]
mod tests {
    use fakegen_codegen::document::{Accessor, Delegation, OverrideParameter, TypeParameterList};

    use super::*;

    fn delegation(storage: &str, arguments: &[&str]) -> Delegation {
        Delegation {
            storage: storage.to_string(),
            arguments: arguments.iter().map(|a| a.to_string()).collect(),
            return_cast: None,
            super_call: None,
        }
    }

    fn function(name: &str, return_type: &str) -> OverrideFunction {
        OverrideFunction {
            name: name.to_string(),
            modifiers: Vec::new(),
            type_parameters: TypeParameterList::default(),
            receiver: None,
            parameters: vec![OverrideParameter {
                name: "id".to_string(),
                ty: "String".to_string(),
                vararg: false,
            }],
            return_type: return_type.to_string(),
            unchecked_cast: false,
            counter: format!("_{name}CallCount"),
            delegation: delegation(&format!("{name}Behavior"), &["id"]),
        }
    }

    #[test]
    fn test_override_returns_stored_behavior() {
        let fun = override_function(&function("find", "User?")).build();
        assert_eq!(
            fun,
            "override fun find(id: String): User? {\n    _findCallCount.update { it + 1 }\n    return findBehavior(id)\n}\n"
        );
    }

    #[test]
    fn test_unit_override_has_no_return() {
        let fun = override_function(&function("delete", "Unit")).build();
        assert!(fun.starts_with("override fun delete(id: String) {"));
        assert!(fun.contains("    deleteBehavior(id)\n"));
        assert!(!fun.contains("return"));
    }

    #[test]
    fn test_super_fallback_avoids_parameter_names() {
        let mut f = function("log", "Unit");
        f.parameters[0].name = "configured".to_string();
        f.delegation = Delegation {
            storage: "logBehavior".to_string(),
            arguments: vec!["configured".to_string()],
            return_cast: None,
            super_call: Some("super.log(configured)".to_string()),
        };
        let fun = override_function(&f).build();
        assert!(fun.contains("    val configured_ = logBehavior\n"));
        assert!(
            fun.contains("    if (configured_ != null) configured_(configured) else super.log(configured)\n")
        );
    }

    #[test]
    fn test_erased_override_is_suppressed() {
        let mut f = function("first", "R");
        f.type_parameters = TypeParameterList {
            declaration: "<R>".to_string(),
            arguments: "<R>".to_string(),
            where_clause: None,
        };
        f.unchecked_cast = true;
        f.delegation.return_cast = Some("R".to_string());
        let fun = override_function(&f).build();
        assert!(fun.starts_with("@Suppress(\"UNCHECKED_CAST\")\noverride fun <R> first(id: String): R {"));
        assert!(fun.contains("return firstBehavior(id) as R\n"));
    }

    #[test]
    fn test_mutable_property_accessors() {
        let property = OverrideProperty {
            name: "count".to_string(),
            ty: "Int".to_string(),
            mutable: true,
            getter: Accessor {
                counter: "_countCallCount".to_string(),
                delegation: delegation("countBehavior", &[]),
            },
            setter: Some(Accessor {
                counter: "_setCountCallCount".to_string(),
                delegation: delegation("setCountBehavior", &["value"]),
            }),
        };
        let mut builder = CodeBuilder::kotlin();
        for fragment in override_property(&property) {
            builder.apply_fragment(fragment);
        }
        assert_eq!(
            builder.build(),
            "override var count: Int\n    get() {\n        _countCallCount.update { it + 1 }\n        return countBehavior()\n    }\n    set(value) {\n        _setCountCallCount.update { it + 1 }\n        setCountBehavior(value)\n    }\n"
        );
    }

    #[test]
    fn test_open_property_setter_falls_back_to_super() {
        let property = OverrideProperty {
            name: "label".to_string(),
            ty: "String".to_string(),
            mutable: true,
            getter: Accessor {
                counter: "_labelCallCount".to_string(),
                delegation: Delegation {
                    super_call: Some("super.label".to_string()),
                    ..delegation("labelBehavior", &[])
                },
            },
            setter: Some(Accessor {
                counter: "_setLabelCallCount".to_string(),
                delegation: Delegation {
                    super_call: Some("super.label = value".to_string()),
                    ..delegation("setLabelBehavior", &["value"])
                },
            }),
        };
        let mut builder = CodeBuilder::kotlin();
        for fragment in override_property(&property) {
            builder.apply_fragment(fragment);
        }
        let text = builder.build();
        assert!(text.contains("return if (configured != null) configured() else super.label\n"));
        assert!(text.contains(
            "        if (configured != null) {\n            configured(value)\n        } else {\n            super.label = value\n        }\n"
        ));
    }

    #[test]
    fn test_dsl_method_casts_erased_behavior() {
        let method = DslMethod {
            name: "identity".to_string(),
            type_parameters: TypeParameterList {
                declaration: "<T>".to_string(),
                arguments: "<T>".to_string(),
                where_clause: None,
            },
            parameter_type: "(T) -> T".to_string(),
            configure: "configureIdentity".to_string(),
            cast: Some("(Any?) -> Any?".to_string()),
        };
        assert_eq!(
            dsl_method(&method).build(),
            "@Suppress(\"UNCHECKED_CAST\")\nfun <T> identity(behavior: (T) -> T) {\n    fake.configureIdentity(behavior as (Any?) -> Any?)\n}\n"
        );
    }
}
