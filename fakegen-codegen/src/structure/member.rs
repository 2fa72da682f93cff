//! Per-member generation.
//!
//! Every configurable behavior produces the same correlated pieces: a
//! storage field, a call counter, the override that counts and then
//! delegates, the configure method and the DSL method forwarding to it.

use fakegen_core::escape_identifier;
use fakegen_ir::{
    Classifier, DefaultValueExpression, FunctionAnalysis, FunctionType, ParameterAnalysis,
    PropertyAnalysis, ResolvedType, TargetKind, TypeArgument, TypeKind, Variance,
};

use crate::{
    analysis::primitive_array,
    defaults::{DefaultValueResolver, MemberDefault},
    document::{
        Accessor, BehaviorStorage, BehaviorSummary, CallCounter, ConfigureMethod, Delegation,
        DslMethod, OverrideFunction, OverrideMember, OverrideParameter, OverrideProperty,
        TypeParameterList,
    },
    generation::ImportCollector,
    generics::ScopingStrategy,
    naming::MemberNames,
    render::TypeRenderer,
};

use super::type_params::type_parameter_list;

/// The pieces generated for one member.
#[derive(Debug, Default)]
pub(super) struct MemberParts {
    pub storage: Vec<BehaviorStorage>,
    pub counters: Vec<CallCounter>,
    pub overrides: Vec<OverrideMember>,
    pub configures: Vec<ConfigureMethod>,
    pub dsl: Vec<DslMethod>,
    pub summary: Vec<BehaviorSummary>,
}

impl MemberParts {
    fn behavior(
        &mut self,
        names: &MemberNames,
        storage_type: String,
        initializer: String,
        summary: BehaviorSummary,
    ) {
        self.storage.push(BehaviorStorage {
            name: names.behavior.clone(),
            ty: storage_type,
            initializer,
        });
        self.counters.push(CallCounter {
            backing: names.counter_backing.clone(),
            name: names.counter.clone(),
        });
        self.summary.push(summary);
    }

    fn configure(&mut self, names: &MemberNames, parameter_type: String) {
        self.configures.push(ConfigureMethod {
            name: names.configure.clone(),
            parameter_type,
            storage: names.behavior.clone(),
        });
    }
}

/// Shared state for generating the members of one declaration.
pub(super) struct MemberContext<'a, 's> {
    pub renderer: TypeRenderer<'s>,
    pub defaults: DefaultValueResolver<'s>,
    pub target: TargetKind,
    /// Declaration name, used in error stub messages.
    pub owner: &'a str,
    pub imports: &'a mut ImportCollector,
}

impl MemberContext<'_, '_> {
    pub fn function(&mut self, function: &FunctionAnalysis, strategy: ScopingStrategy) -> MemberParts {
        let names = MemberNames::new(&function.name);
        let owner = format!("{}.{}", self.owner, function.name);

        // Storage takes the receiver as its first parameter.
        let preserved = storage_function(function, None);
        let erased = strategy.storage_type(&preserved);
        let preserved_text = self.renderer.render(&preserved, true);
        let storage_text = self.renderer.render(&erased, true);
        let storage_return = strategy.storage_type(&function.return_type);

        // An open class member keeps its real implementation until configured.
        let falls_back = self.falls_back(function.is_abstract);
        let (storage_type, initializer, default_label) = if falls_back {
            (
                self.renderer.render(&erased.nullable(), true),
                "null".to_string(),
                "super".to_string(),
            )
        } else {
            let default = self.function_default(function, &storage_return, &owner);
            (storage_text.clone(), default.lambda(), default.strategy().to_string())
        };

        let erasing = strategy == ScopingStrategy::DynamicErasure;
        let mut arguments = Vec::new();
        let mut casts = false;
        if let Some(receiver) = &function.extension_receiver {
            let (argument, cast) = self.argument("this", receiver, strategy);
            casts |= cast;
            arguments.push(argument);
        }
        for param in &function.parameters {
            let ty = parameter_storage_type(param);
            let (argument, cast) = self.argument(&escape_identifier(&param.name), &ty, strategy);
            casts |= cast;
            arguments.push(argument);
        }

        let return_text = self.renderer.render(&function.return_type, true);
        let return_cast = (erasing && self.renderer.render(&storage_return, true) != return_text)
            .then(|| return_text.clone());

        let super_call = falls_back.then(|| {
            let args: Vec<String> = function
                .parameters
                .iter()
                .map(|p| {
                    let name = escape_identifier(&p.name);
                    if p.is_vararg { format!("*{name}") } else { name }
                })
                .collect();
            format!("super.{}({})", names.member, args.join(", "))
        });

        let type_parameters = type_parameter_list(&self.renderer, &function.type_parameters);
        let mut modifiers = Vec::new();
        if function.is_suspend {
            modifiers.push("suspend".to_string());
        }
        if function.is_operator {
            modifiers.push("operator".to_string());
        }
        if function.is_infix {
            modifiers.push("infix".to_string());
        }

        let mut parts = MemberParts::default();
        parts.behavior(
            &names,
            storage_type,
            initializer,
            BehaviorSummary {
                behavior: function.name.clone(),
                scoping: strategy,
                default: default_label,
            },
        );
        parts.overrides.push(OverrideMember::Function(OverrideFunction {
            name: names.member.clone(),
            modifiers,
            type_parameters: type_parameters.clone(),
            receiver: function
                .extension_receiver
                .as_ref()
                .map(|r| self.receiver_text(r)),
            parameters: function
                .parameters
                .iter()
                .map(|p| OverrideParameter {
                    name: escape_identifier(&p.name),
                    ty: self.renderer.render(&p.ty, true),
                    vararg: p.is_vararg,
                })
                .collect(),
            return_type: return_text,
            unchecked_cast: return_cast.is_some() || casts,
            counter: names.counter_backing.clone(),
            delegation: Delegation {
                storage: names.behavior.clone(),
                arguments,
                return_cast,
                super_call,
            },
        }));
        parts.configure(&names, storage_text.clone());

        // The DSL takes the full signature; extensions keep their receiver.
        let parameter_type = if function.extension_receiver.is_some() {
            let signature = storage_function(function, function.extension_receiver.clone());
            self.renderer.render(&signature, true)
        } else {
            preserved_text.clone()
        };
        parts.dsl.push(DslMethod {
            name: names.dsl.clone(),
            type_parameters,
            parameter_type,
            configure: names.configure.clone(),
            cast: (erasing && storage_text != preserved_text).then_some(storage_text),
        });
        parts
    }

    pub fn property(&mut self, property: &PropertyAnalysis) -> MemberParts {
        let getter = MemberNames::new(&property.name);
        let owner = format!("{}.{}", self.owner, property.name);
        let ty_text = self.renderer.render(&property.ty, true);
        let falls_back = self.falls_back(property.is_abstract);

        let getter_type = format!("() -> {ty_text}");
        let setter_type = format!("({ty_text}) -> Unit");
        let mut parts = MemberParts::default();

        let (storage_type, initializer, default_label) = if falls_back {
            (format!("({getter_type})?"), "null".to_string(), "super".to_string())
        } else {
            let value = if self.target == TargetKind::Class {
                DefaultValueExpression::error_stub(&owner)
            } else {
                self.defaults.resolve(&property.ty, &owner, self.imports)
            };
            let default = MemberDefault::ignoring(0, value);
            (getter_type.clone(), default.lambda(), default.strategy().to_string())
        };
        parts.behavior(
            &getter,
            storage_type,
            initializer,
            BehaviorSummary {
                behavior: property.name.clone(),
                scoping: ScopingStrategy::Preserving,
                default: default_label,
            },
        );
        parts.configure(&getter, getter_type.clone());
        parts.dsl.push(DslMethod {
            name: getter.dsl.clone(),
            type_parameters: TypeParameterList::default(),
            parameter_type: getter_type,
            configure: getter.configure.clone(),
            cast: None,
        });

        let setter = property.is_mutable.then(|| {
            let names = MemberNames::setter(&property.name);
            let (storage_type, initializer, default_label) = if falls_back {
                (format!("({setter_type})?"), "null".to_string(), "super".to_string())
            } else {
                // Writes turn the getter into a constant returning the value.
                (
                    setter_type.clone(),
                    format!("{{ value -> {} = {{ value }} }}", getter.behavior),
                    "store".to_string(),
                )
            };
            parts.behavior(
                &names,
                storage_type,
                initializer,
                BehaviorSummary {
                    behavior: names.dsl.clone(),
                    scoping: ScopingStrategy::Preserving,
                    default: default_label,
                },
            );
            parts.configure(&names, setter_type.clone());
            parts.dsl.push(DslMethod {
                name: names.dsl.clone(),
                type_parameters: TypeParameterList::default(),
                parameter_type: setter_type.clone(),
                configure: names.configure.clone(),
                cast: None,
            });
            Accessor {
                counter: names.counter_backing.clone(),
                delegation: Delegation {
                    storage: names.behavior.clone(),
                    arguments: vec!["value".to_string()],
                    return_cast: None,
                    super_call: falls_back.then(|| format!("super.{} = value", getter.member)),
                },
            }
        });

        parts.overrides.push(OverrideMember::Property(OverrideProperty {
            name: getter.member.clone(),
            ty: ty_text,
            mutable: property.is_mutable,
            getter: Accessor {
                counter: getter.counter_backing.clone(),
                delegation: Delegation {
                    storage: getter.behavior.clone(),
                    arguments: Vec::new(),
                    return_cast: None,
                    super_call: falls_back.then(|| format!("super.{}", getter.member)),
                },
            },
            setter,
        }));
        parts
    }

    fn falls_back(&self, is_abstract: bool) -> bool {
        self.target == TargetKind::Class && !is_abstract
    }

    fn function_default(
        &mut self,
        function: &FunctionAnalysis,
        storage_return: &ResolvedType,
        owner: &str,
    ) -> MemberDefault {
        if self.target == TargetKind::Class {
            // Abstract class members must be configured explicitly.
            let arity =
                usize::from(function.extension_receiver.is_some()) + function.parameters.len();
            return MemberDefault::ignoring(arity, DefaultValueExpression::error_stub(owner));
        }
        self.defaults
            .resolve_function(function, storage_return, owner, self.imports)
    }

    /// A call argument, cast to its storage type when erasure changed a
    /// type that is not a plain type parameter.
    fn argument(&self, name: &str, ty: &ResolvedType, strategy: ScopingStrategy) -> (String, bool) {
        if strategy != ScopingStrategy::DynamicErasure || ty.as_type_parameter().is_some() {
            return (name.to_string(), false);
        }
        let preserved = self.renderer.render(ty, true);
        let erased = self.renderer.render(&strategy.storage_type(ty), true);
        if preserved == erased {
            (name.to_string(), false)
        } else {
            (format!("{name} as {erased}"), true)
        }
    }

    fn receiver_text(&self, receiver: &ResolvedType) -> String {
        let text = self.renderer.render(receiver, true);
        if receiver.as_function().is_some() && !receiver.nullable {
            format!("({text})")
        } else {
            text
        }
    }
}

/// The function type stored for a function: receiver and parameters in
/// order, varargs as arrays. With `receiver` set, the receiver stays a
/// receiver instead of becoming the first parameter.
fn storage_function(function: &FunctionAnalysis, receiver: Option<ResolvedType>) -> ResolvedType {
    let mut parameters = Vec::new();
    if receiver.is_none()
        && let Some(r) = &function.extension_receiver
    {
        parameters.push(r.clone());
    }
    parameters.extend(function.parameters.iter().map(parameter_storage_type));
    ResolvedType::new(
        TypeKind::Function(FunctionType {
            receiver: receiver.map(Box::new),
            parameters,
            return_type: Box::new(function.return_type.clone()),
            is_suspend: function.is_suspend,
        }),
        false,
    )
}

/// The type a parameter has inside the function body.
fn parameter_storage_type(param: &ParameterAnalysis) -> ResolvedType {
    if !param.is_vararg {
        return param.ty.clone();
    }
    if !param.ty.nullable
        && let Some(array) = param
            .ty
            .classifier()
            .and_then(|c| primitive_array(&c.qualified_name()))
    {
        return ResolvedType::builtin("kotlin", array);
    }
    ResolvedType::class(
        Classifier::builtin("kotlin", "Array"),
        vec![TypeArgument::Type {
            variance: Variance::Covariant,
            ty: param.ty.clone(),
        }],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vararg_storage_types() {
        let int = ParameterAnalysis {
            name: "xs".to_string(),
            ty: ResolvedType::builtin("kotlin", "Int"),
            is_vararg: true,
        };
        assert!(parameter_storage_type(&int).is_class("kotlin.IntArray"));

        let nullable = ParameterAnalysis {
            ty: ResolvedType::builtin("kotlin", "Int").nullable(),
            ..int.clone()
        };
        assert!(parameter_storage_type(&nullable).is_class("kotlin.Array"));

        let plain = ParameterAnalysis {
            is_vararg: false,
            ..int
        };
        assert!(parameter_storage_type(&plain).is_class("kotlin.Int"));
    }
}
