//! Default value resolution.
//!
//! Every behavior storage field starts out holding a default. A default must
//! always compile; when no safe value exists the default is an error stub
//! that fails the moment the unconfigured member is called.

use std::collections::HashSet;

use fakegen_core::escape_identifier;
use fakegen_ir::{
    DefaultStrategy, DefaultValueExpression, FunctionAnalysis, ResolvedType, TypeArgument,
    TypeKind,
};
use tracing::trace;

use crate::{generation::ImportCollector, session::AnalysisSession};

const FLOW_PACKAGE: &str = "kotlinx.coroutines.flow";

/// A default behavior: the lambda parameters and the value it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDefault {
    /// Lambda parameter names; `_` for parameters the value does not use.
    pub parameters: Vec<String>,
    pub value: DefaultValueExpression,
}

impl MemberDefault {
    /// A default that ignores `arity` parameters.
    pub fn ignoring(arity: usize, value: DefaultValueExpression) -> Self {
        Self {
            parameters: vec!["_".to_string(); arity],
            value,
        }
    }

    /// The default as a Kotlin lambda literal (`{ _, id -> id }`).
    pub fn lambda(&self) -> String {
        if self.parameters.is_empty() {
            format!("{{ {} }}", self.value.expression)
        } else {
            format!(
                "{{ {} -> {} }}",
                self.parameters.join(", "),
                self.value.expression
            )
        }
    }

    pub fn strategy(&self) -> DefaultStrategy {
        self.value.strategy
    }
}

/// Computes safe default expressions for types and member signatures.
#[derive(Debug, Clone, Copy)]
pub struct DefaultValueResolver<'s> {
    session: &'s AnalysisSession,
}

impl<'s> DefaultValueResolver<'s> {
    pub fn new(session: &'s AnalysisSession) -> Self {
        Self { session }
    }

    /// Resolve a default value for `ty`.
    ///
    /// `ty` is the type as seen by behavior storage: type parameters that
    /// storage erases have already become `Any?`. `owner` names the member
    /// in error stubs. Symbols the expression needs are added to `imports`.
    pub fn resolve(
        &self,
        ty: &ResolvedType,
        owner: &str,
        imports: &mut ImportCollector,
    ) -> DefaultValueExpression {
        let mut visiting = HashSet::new();
        let value = self.resolve_value(ty, owner, imports, &mut visiting);
        trace!(owner, strategy = %value.strategy, expression = %value.expression, "resolved default");
        value
    }

    /// Resolve the default behavior of a function.
    ///
    /// Generic passthrough shapes are detected first: returning the argument
    /// (identity) or invoking the supplied block (function invocation).
    /// A non-null return that storage erased to `Any?` gets an error stub.
    /// Otherwise the storage return type is resolved with [`resolve`](Self::resolve).
    pub fn resolve_function(
        &self,
        function: &FunctionAnalysis,
        storage_return: &ResolvedType,
        owner: &str,
        imports: &mut ImportCollector,
    ) -> MemberDefault {
        let receiver_arity = usize::from(function.extension_receiver.is_some());
        let arity = receiver_arity + function.parameters.len();

        if let Some(default) = passthrough(function, receiver_arity) {
            trace!(owner, strategy = %default.value.strategy, "resolved passthrough default");
            return default;
        }

        if storage_return.nullable && !function.return_type.nullable {
            trace!(owner, "erased non-null return");
            return MemberDefault::ignoring(arity, DefaultValueExpression::error_stub(owner));
        }

        MemberDefault::ignoring(arity, self.resolve(storage_return, owner, imports))
    }

    fn resolve_value(
        &self,
        ty: &ResolvedType,
        owner: &str,
        imports: &mut ImportCollector,
        visiting: &mut HashSet<String>,
    ) -> DefaultValueExpression {
        if let Some(literal) = self.table(ty, owner, imports, visiting) {
            return literal;
        }
        if ty.nullable {
            return DefaultValueExpression::null();
        }
        if let TypeKind::Class { classifier, .. } = &ty.kind
            && self.session.shapes().get(&classifier.qualified_name()).is_some()
        {
            return self.construct(ty, owner, imports, visiting);
        }
        DefaultValueExpression::error_stub(owner)
    }

    /// Well-known classifiers. Returns `None` when the type is not in the
    /// table or an argument has no safe default.
    fn table(
        &self,
        ty: &ResolvedType,
        owner: &str,
        imports: &mut ImportCollector,
        visiting: &mut HashSet<String>,
    ) -> Option<DefaultValueExpression> {
        let classifier = ty.classifier()?;
        let literal = match classifier.qualified_name().as_str() {
            "kotlin.String" | "kotlin.CharSequence" => "\"\"",
            "kotlin.Int" | "kotlin.Number" => "0",
            "kotlin.Long" => "0L",
            "kotlin.Short" => "0.toShort()",
            "kotlin.Byte" => "0.toByte()",
            "kotlin.Double" => "0.0",
            "kotlin.Float" => "0.0f",
            "kotlin.Boolean" => "false",
            "kotlin.Char" => "'\\u0000'",
            "kotlin.Unit" => "Unit",
            // `Any?` is the erased top type; it defaults to null
            "kotlin.Any" if !ty.nullable => "Any()",
            "kotlin.collections.List"
            | "kotlin.collections.Collection"
            | "kotlin.collections.Iterable" => "emptyList()",
            "kotlin.collections.MutableList" | "kotlin.collections.MutableCollection" => {
                "mutableListOf()"
            }
            "kotlin.collections.ArrayList" => "arrayListOf()",
            "kotlin.collections.Set" => "emptySet()",
            "kotlin.collections.MutableSet" | "kotlin.collections.LinkedHashSet" => {
                "mutableSetOf()"
            }
            "kotlin.collections.HashSet" => "hashSetOf()",
            "kotlin.collections.Map" => "emptyMap()",
            "kotlin.collections.MutableMap" | "kotlin.collections.LinkedHashMap" => {
                "mutableMapOf()"
            }
            "kotlin.collections.HashMap" => "hashMapOf()",
            "kotlin.sequences.Sequence" => "emptySequence()",
            "kotlin.IntArray" => "intArrayOf()",
            "kotlin.LongArray" => "longArrayOf()",
            "kotlin.ShortArray" => "shortArrayOf()",
            "kotlin.ByteArray" => "byteArrayOf()",
            "kotlin.DoubleArray" => "doubleArrayOf()",
            "kotlin.FloatArray" => "floatArrayOf()",
            "kotlin.BooleanArray" => "booleanArrayOf()",
            "kotlin.CharArray" => "charArrayOf()",
            "kotlin.Array" => {
                // emptyArray() needs a reified element type
                let element = ty.arguments().first().and_then(TypeArgument::ty)?;
                if element.mentions_type_parameter(&|_, _| true) {
                    return None;
                }
                "emptyArray()"
            }
            "kotlin.Result" => {
                let inner = self.argument(ty, 0, owner, imports, visiting)?;
                let result = imports.import_or_qualify("kotlin", "Result");
                return Some(DefaultValueExpression::literal(format!(
                    "{result}.success({inner})"
                )));
            }
            "kotlin.Pair" | "kotlin.Triple" => {
                let arity = if classifier.name == "Pair" { 2 } else { 3 };
                let values = (0..arity)
                    .map(|i| self.argument(ty, i, owner, imports, visiting))
                    .collect::<Option<Vec<_>>>()?;
                let name = imports.import_or_qualify("kotlin", &classifier.name);
                return Some(DefaultValueExpression::literal(format!(
                    "{name}({})",
                    values.join(", ")
                )));
            }
            "kotlinx.coroutines.flow.Flow" => {
                imports.add(FLOW_PACKAGE, "emptyFlow");
                "emptyFlow()"
            }
            "kotlinx.coroutines.flow.StateFlow" | "kotlinx.coroutines.flow.MutableStateFlow" => {
                let inner = self.argument(ty, 0, owner, imports, visiting)?;
                let flow = imports.import_or_qualify(FLOW_PACKAGE, "MutableStateFlow");
                return Some(DefaultValueExpression::literal(format!("{flow}({inner})")));
            }
            "kotlinx.coroutines.flow.SharedFlow" | "kotlinx.coroutines.flow.MutableSharedFlow" => {
                let flow = imports.import_or_qualify(FLOW_PACKAGE, "MutableSharedFlow");
                return Some(DefaultValueExpression::literal(format!("{flow}()")));
            }
            _ => return None,
        };
        Some(DefaultValueExpression::literal(literal))
    }

    /// Default of the `index`th generic argument, if it has a safe one.
    fn argument(
        &self,
        ty: &ResolvedType,
        index: usize,
        owner: &str,
        imports: &mut ImportCollector,
        visiting: &mut HashSet<String>,
    ) -> Option<String> {
        let arg = ty.arguments().get(index).and_then(TypeArgument::ty)?;
        let value = self.resolve_value(arg, owner, imports, visiting);
        (!value.is_error_stub()).then_some(value.expression)
    }

    /// Build a data shape from its field defaults.
    fn construct(
        &self,
        ty: &ResolvedType,
        owner: &str,
        imports: &mut ImportCollector,
        visiting: &mut HashSet<String>,
    ) -> DefaultValueExpression {
        let Some(classifier) = ty.classifier() else {
            return DefaultValueExpression::error_stub(owner);
        };
        let qualified = classifier.qualified_name();
        let Some(shape) = self.session.shapes().get(&qualified) else {
            return DefaultValueExpression::error_stub(owner);
        };
        if !visiting.insert(qualified.clone()) {
            trace!(shape = %qualified, "cycle in shape construction");
            return DefaultValueExpression::error_stub(owner);
        }

        let mut arguments = Vec::with_capacity(shape.fields.len());
        let mut field_imports = imports.clone();
        let mut failed = false;
        for (name, field_ty) in shape.instantiate_fields(ty.arguments()) {
            let value = self.resolve_value(&field_ty, owner, &mut field_imports, visiting);
            if value.is_error_stub() {
                failed = true;
                break;
            }
            arguments.push(format!("{} = {}", escape_identifier(name), value.expression));
        }
        visiting.remove(&qualified);

        if failed {
            return DefaultValueExpression::error_stub(owner);
        }
        *imports = field_imports;
        let outer = imports.import_or_qualify(&classifier.package, classifier.import_name());
        let name = match classifier.name.split_once('.') {
            Some((_, nested)) => format!("{outer}.{nested}"),
            None => outer,
        };
        DefaultValueExpression::new(
            format!("{name}({})", arguments.join(", ")),
            DefaultStrategy::RecursiveConstruction,
        )
    }
}

/// Detect the identity and function-invocation shapes.
///
/// Both only apply when the function returns one of its type parameters and
/// takes exactly one value parameter.
fn passthrough(function: &FunctionAnalysis, receiver_arity: usize) -> Option<MemberDefault> {
    let [param] = function.parameters.as_slice() else {
        return None;
    };
    let ret = &function.return_type;
    if ret.as_type_parameter().is_none() || param.is_vararg {
        return None;
    }

    let mut parameters = vec!["_".to_string(); receiver_arity];
    let name = escape_identifier(&param.name);

    if param.ty.same_shape_ignoring_nullability(ret) && !(param.ty.nullable && !ret.nullable) {
        parameters.push(name.clone());
        return Some(MemberDefault {
            parameters,
            value: DefaultValueExpression::new(name, DefaultStrategy::Identity),
        });
    }

    let block = param.ty.as_function()?;
    let invocable = !param.ty.nullable
        && block.parameters.is_empty()
        && block.receiver.is_none()
        && (function.is_suspend || !block.is_suspend)
        && block.return_type.same_shape_ignoring_nullability(ret)
        && !(block.return_type.nullable && !ret.nullable);
    if invocable {
        parameters.push(name.clone());
        return Some(MemberDefault {
            parameters,
            value: DefaultValueExpression::new(
                format!("{name}()"),
                DefaultStrategy::FunctionInvocation,
            ),
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use fakegen_ir::{
        Classifier, ClassifierOrigin, DataShape, FunctionType, ParameterAnalysis, ShapeCatalog,
        ShapeField, TypeParameterDescriptor, TypeParameterScope,
    };

    use super::*;

    fn builtin(name: &str) -> ResolvedType {
        let package = crate::analysis::builtin_package(name).unwrap();
        ResolvedType::builtin(package, name)
    }

    fn generic(name: &str, args: Vec<ResolvedType>) -> ResolvedType {
        let package = crate::analysis::builtin_package(name).unwrap();
        ResolvedType::builtin_generic(package, name, args)
    }

    fn shape_type(name: &str) -> ResolvedType {
        ResolvedType::class(
            Classifier::new("com.example.model", name, ClassifierOrigin::Shape),
            vec![],
        )
    }

    fn resolve_with(session: &AnalysisSession, ty: &ResolvedType) -> (DefaultValueExpression, ImportCollector) {
        let mut imports = ImportCollector::new();
        let value = DefaultValueResolver::new(session).resolve(ty, "Repo.find", &mut imports);
        (value, imports)
    }

    fn resolve(ty: &ResolvedType) -> DefaultValueExpression {
        resolve_with(&AnalysisSession::new(), ty).0
    }

    fn t() -> ResolvedType {
        ResolvedType::type_parameter("T", TypeParameterScope::Method)
    }

    fn function(parameters: Vec<ResolvedType>, ret: ResolvedType) -> FunctionAnalysis {
        FunctionAnalysis {
            name: "process".to_string(),
            parameters: parameters
                .into_iter()
                .enumerate()
                .map(|(i, ty)| ParameterAnalysis {
                    name: if i == 0 { "data".to_string() } else { format!("p{i}") },
                    ty,
                    is_vararg: false,
                })
                .collect(),
            return_type: ret,
            is_suspend: false,
            is_operator: false,
            is_infix: false,
            extension_receiver: None,
            type_parameters: vec![TypeParameterDescriptor::new("T", TypeParameterScope::Method)],
            is_abstract: true,
        }
    }

    fn resolve_function(function: &FunctionAnalysis) -> MemberDefault {
        let session = AnalysisSession::new();
        let mut imports = ImportCollector::new();
        DefaultValueResolver::new(&session).resolve_function(
            function,
            &ResolvedType::nullable_any(),
            "Processor.process",
            &mut imports,
        )
    }

    #[test]
    fn test_literal_table() {
        let cases = [
            (builtin("String"), "\"\""),
            (builtin("Int"), "0"),
            (builtin("Long"), "0L"),
            (builtin("Boolean"), "false"),
            (builtin("Char"), "'\\u0000'"),
            (builtin("Unit"), "Unit"),
            (generic("List", vec![builtin("String")]), "emptyList()"),
            (generic("Map", vec![builtin("String"), builtin("Int")]), "emptyMap()"),
            (generic("MutableSet", vec![builtin("Int")]), "mutableSetOf()"),
            (generic("HashMap", vec![builtin("Int"), builtin("Int")]), "hashMapOf()"),
            (builtin("IntArray"), "intArrayOf()"),
            (generic("Array", vec![builtin("String")]), "emptyArray()"),
        ];
        for (ty, expected) in cases {
            let value = resolve(&ty);
            assert_eq!(value.expression, expected);
            assert_eq!(value.strategy, DefaultStrategy::Literal);
        }
    }

    #[test]
    fn test_table_applies_before_nullability() {
        assert_eq!(resolve(&builtin("String").nullable()).expression, "\"\"");
        assert_eq!(resolve(&builtin("Any").nullable()), DefaultValueExpression::null());
        assert_eq!(resolve(&builtin("Any")).expression, "Any()");
    }

    #[test]
    fn test_composite_literals() {
        let result = generic("Result", vec![generic("List", vec![builtin("Int")])]);
        assert_eq!(resolve(&result).expression, "Result.success(emptyList())");

        let pair = generic("Pair", vec![builtin("String"), builtin("Int").nullable()]);
        assert_eq!(resolve(&pair).expression, "Pair(\"\", 0)");

        let (value, imports) = resolve_with(
            &AnalysisSession::new(),
            &generic("StateFlow", vec![builtin("Boolean")]),
        );
        assert_eq!(value.expression, "MutableStateFlow(false)");
        assert!(imports.has_symbol("kotlinx.coroutines.flow", "MutableStateFlow"));

        let (value, imports) =
            resolve_with(&AnalysisSession::new(), &generic("Flow", vec![builtin("Int")]));
        assert_eq!(value.expression, "emptyFlow()");
        assert!(imports.has_symbol("kotlinx.coroutines.flow", "emptyFlow"));
    }

    #[test]
    fn test_composite_with_unsafe_argument() {
        let preserved = ResolvedType::type_parameter("T", TypeParameterScope::Class);
        let result = generic("Result", vec![preserved.clone()]);
        assert!(resolve(&result).is_error_stub());
        assert_eq!(resolve(&result.nullable()), DefaultValueExpression::null());

        // emptyArray() cannot be called for a non-reified element
        assert!(resolve(&generic("Array", vec![preserved])).is_error_stub());
    }

    #[test]
    fn test_type_parameters() {
        let preserved = ResolvedType::type_parameter("T", TypeParameterScope::Class);
        let stub = resolve(&preserved);
        assert_eq!(stub.expression, "error(\"Repo.find not configured\")");
        assert_eq!(stub.strategy, DefaultStrategy::ErrorStub);

        assert_eq!(resolve(&preserved.nullable()), DefaultValueExpression::null());
        assert_eq!(resolve(&ResolvedType::nullable_any()), DefaultValueExpression::null());
    }

    #[test]
    fn test_function_types_and_unknown_classes_are_stubbed() {
        let callback = ResolvedType::function(vec![], ResolvedType::unit());
        assert!(resolve(&callback).is_error_stub());
        assert_eq!(resolve(&callback.nullable()), DefaultValueExpression::null());

        let unknown = ResolvedType::class(Classifier::unresolved("Widget"), vec![]);
        assert!(resolve(&unknown).is_error_stub());
    }

    fn user_shapes() -> ShapeCatalog {
        [
            DataShape {
                name: "User".to_string(),
                package: "com.example.model".to_string(),
                type_parameters: vec![],
                fields: vec![
                    ShapeField {
                        name: "id".to_string(),
                        ty: builtin("String"),
                    },
                    ShapeField {
                        name: "address".to_string(),
                        ty: shape_type("Address"),
                    },
                    ShapeField {
                        name: "in".to_string(),
                        ty: builtin("Boolean"),
                    },
                ],
            },
            DataShape {
                name: "Address".to_string(),
                package: "com.example.model".to_string(),
                type_parameters: vec![],
                fields: vec![ShapeField {
                    name: "lines".to_string(),
                    ty: generic("List", vec![builtin("String")]),
                }],
            },
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_recursive_construction() {
        let session = AnalysisSession::with_shapes(user_shapes());

        let (value, imports) = resolve_with(&session, &shape_type("User"));
        assert_eq!(
            value.expression,
            "User(id = \"\", address = Address(lines = emptyList()), `in` = false)"
        );
        assert_eq!(value.strategy, DefaultStrategy::RecursiveConstruction);
        assert!(imports.has_symbol("com.example.model", "User"));
        assert!(imports.has_symbol("com.example.model", "Address"));
    }

    #[test]
    fn test_construction_qualifies_taken_names() {
        let session = AnalysisSession::with_shapes(user_shapes());
        let mut imports = ImportCollector::new();
        imports.add("com.example.geo", "Address");

        let value = DefaultValueResolver::new(&session).resolve(
            &shape_type("User"),
            "Repo.find",
            &mut imports,
        );
        assert_eq!(
            value.expression,
            "User(id = \"\", address = com.example.model.Address(lines = emptyList()), `in` = false)"
        );
        assert!(imports.has_symbol("com.example.model", "User"));
        assert!(!imports.has_symbol("com.example.model", "Address"));
    }

    #[test]
    fn test_recursive_construction_stops_at_cycles() {
        let shapes: ShapeCatalog = [DataShape {
            name: "Node".to_string(),
            package: "com.example.model".to_string(),
            type_parameters: vec![],
            fields: vec![ShapeField {
                name: "next".to_string(),
                ty: shape_type("Node"),
            }],
        }]
        .into_iter()
        .collect();
        let session = AnalysisSession::with_shapes(shapes);

        let (value, imports) = resolve_with(&session, &shape_type("Node"));
        assert!(value.is_error_stub());
        assert!(imports.is_empty());
    }

    #[test]
    fn test_nullable_self_reference_terminates_cycle() {
        let shapes: ShapeCatalog = [DataShape {
            name: "Node".to_string(),
            package: "com.example.model".to_string(),
            type_parameters: vec![],
            fields: vec![ShapeField {
                name: "next".to_string(),
                ty: shape_type("Node").nullable(),
            }],
        }]
        .into_iter()
        .collect();
        let session = AnalysisSession::with_shapes(shapes);

        let (value, _) = resolve_with(&session, &shape_type("Node"));
        assert_eq!(value.expression, "Node(next = null)");
    }

    #[test]
    fn test_identity_pattern() {
        let default = resolve_function(&function(vec![t()], t()));
        assert_eq!(default.strategy(), DefaultStrategy::Identity);
        assert_eq!(default.lambda(), "{ data -> data }");

        let nullable = resolve_function(&function(vec![t().nullable()], t().nullable()));
        assert_eq!(nullable.strategy(), DefaultStrategy::Identity);

        // A nullable argument cannot be returned as a non-null result
        let narrowing = resolve_function(&function(vec![t().nullable()], t()));
        assert_ne!(narrowing.strategy(), DefaultStrategy::Identity);
    }

    #[test]
    fn test_identity_requires_single_parameter() {
        let default = resolve_function(&function(vec![t(), builtin("Int")], t().nullable()));
        assert_eq!(default.strategy(), DefaultStrategy::Null);
        assert_eq!(default.lambda(), "{ _, _ -> null }");
    }

    #[test]
    fn test_erased_non_null_return_is_stubbed() {
        let default = resolve_function(&function(vec![], t()));
        assert_eq!(default.strategy(), DefaultStrategy::ErrorStub);
        assert_eq!(
            default.lambda(),
            "{ error(\"Processor.process not configured\") }"
        );

        let two = resolve_function(&function(vec![t(), builtin("Int")], t()));
        assert_eq!(two.strategy(), DefaultStrategy::ErrorStub);

        let narrowing = resolve_function(&function(vec![t().nullable()], t()));
        assert_eq!(narrowing.strategy(), DefaultStrategy::ErrorStub);
    }

    #[test]
    fn test_function_invocation_pattern() {
        let block = ResolvedType::function(vec![], t());
        let default = resolve_function(&function(vec![block], t()));
        assert_eq!(default.strategy(), DefaultStrategy::FunctionInvocation);
        assert_eq!(default.lambda(), "{ data -> data() }");
    }

    #[test]
    fn test_suspend_block_needs_suspend_member() {
        let block = ResolvedType::new(
            TypeKind::Function(FunctionType {
                receiver: None,
                parameters: vec![],
                return_type: Box::new(t()),
                is_suspend: true,
            }),
            false,
        );
        let mut f = function(vec![block], t());
        assert_ne!(resolve_function(&f).strategy(), DefaultStrategy::FunctionInvocation);

        f.is_suspend = true;
        assert_eq!(resolve_function(&f).strategy(), DefaultStrategy::FunctionInvocation);
    }

    #[test]
    fn test_extension_receiver_is_ignored_by_lambda() {
        let mut f = function(vec![t()], t());
        f.extension_receiver = Some(builtin("String"));
        assert_eq!(resolve_function(&f).lambda(), "{ _, data -> data }");
    }

    #[test]
    fn test_counter_scenario() {
        let session = AnalysisSession::new();
        let mut imports = ImportCollector::new();
        let increment = FunctionAnalysis {
            name: "increment".to_string(),
            parameters: vec![ParameterAnalysis {
                name: "by".to_string(),
                ty: builtin("Int"),
                is_vararg: false,
            }],
            return_type: builtin("Int"),
            is_suspend: false,
            is_operator: false,
            is_infix: false,
            extension_receiver: None,
            type_parameters: vec![],
            is_abstract: true,
        };
        let default = DefaultValueResolver::new(&session).resolve_function(
            &increment,
            &increment.return_type,
            "Counter.increment",
            &mut imports,
        );
        assert_eq!(default.lambda(), "{ _ -> 0 }");
    }
}
