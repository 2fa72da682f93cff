//! The Code Structure Builder.
//!
//! Turns a [`DeclarationAnalysis`] into a [`GeneratedCodeDocument`]. The
//! implementation class, the factory and the DSL class are built from one
//! shared type parameter list and one set of [`MemberNames`](crate::naming::MemberNames),
//! so they cannot drift apart.

mod member;
mod type_params;

use fakegen_ir::{
    DeclarationAnalysis, Member, ResolvedType, TargetKind, TypeBound, TypeParameterDescriptor,
};
use tracing::debug;

pub use self::type_params::type_parameter_list;
use self::member::{MemberContext, MemberParts};
use crate::{
    defaults::DefaultValueResolver,
    document::{
        BehaviorSummary, ConfigDslClass, DslMethod, FactoryFunction, GeneratedCodeDocument,
        ImplementationClass, ImplementationMember,
    },
    generation::ImportCollector,
    generics::ScopingStrategy,
    naming::DeclarationNames,
    render::TypeRenderer,
    session::AnalysisSession,
};

/// Package of the call counter types.
pub const FLOW_PACKAGE: &str = "kotlinx.coroutines.flow";

/// `kotlin` names the generated members write without an import.
const IMPLICIT_NAMES: [&str; 4] = ["Any", "Array", "Int", "Unit"];

/// Builds generated code documents within one analysis session.
#[derive(Debug, Clone, Copy)]
pub struct StructureBuilder<'s> {
    session: &'s AnalysisSession,
}

impl<'s> StructureBuilder<'s> {
    pub fn new(session: &'s AnalysisSession) -> Self {
        Self { session }
    }

    /// Build the document for one analyzed declaration.
    pub fn build(&self, analysis: &DeclarationAnalysis) -> GeneratedCodeDocument {
        let names = DeclarationNames::new(&analysis.name);
        let pattern = self.session.generic_pattern(analysis);

        let mut imports = ImportCollector::new();
        let declared = analysis.name.split('.').next().unwrap_or(&analysis.name);
        imports.claim(&analysis.package, declared);
        for symbol in IMPLICIT_NAMES {
            imports.claim("kotlin", symbol);
        }
        for symbol in ["MutableStateFlow", "StateFlow", "update"] {
            imports.add(FLOW_PACKAGE, symbol);
        }
        collect_imports(analysis, &mut imports);
        let qualified = imports.qualified().clone();
        let renderer = TypeRenderer::new(self.session).qualifying(&qualified);

        let type_parameters = type_parameter_list(&renderer, &analysis.type_parameters);
        let args = &type_parameters.arguments;
        let declaration_type = format!("{}{}", analysis.name, args);
        let implementation_type = format!("{}{}", names.implementation, args);
        let config_type = format!("{}{}", names.config, args);

        let mut parts = Vec::new();
        {
            let mut context = MemberContext {
                renderer,
                defaults: DefaultValueResolver::new(self.session),
                target: analysis.target,
                owner: &analysis.name,
                imports: &mut imports,
            };
            for member in analysis.members() {
                parts.push(match member {
                    Member::Function(function) => {
                        let strategy = ScopingStrategy::for_function(pattern, function);
                        context.function(function, strategy)
                    }
                    Member::Property(property) => context.property(property),
                });
            }
        }
        let (members, methods, summary) = assemble(parts);

        let supertype = match analysis.target {
            TargetKind::Interface => declaration_type.clone(),
            TargetKind::Class => format!("{declaration_type}()"),
        };

        debug!(
            declaration = %analysis.qualified_name(),
            %pattern,
            members = members.len(),
            "built document"
        );

        GeneratedCodeDocument {
            package: analysis.package.clone(),
            declaration: analysis.name.clone(),
            file_stem: names.file_stem().to_string(),
            pattern,
            imports,
            implementation: ImplementationClass {
                name: names.implementation.clone(),
                type_parameters: type_parameters.clone(),
                supertype,
                members,
            },
            factory: FactoryFunction {
                name: names.factory.clone(),
                type_parameters: type_parameters.clone(),
                config_type,
                implementation_type: implementation_type.clone(),
                return_type: declaration_type,
            },
            config: ConfigDslClass {
                name: names.config,
                type_parameters,
                implementation_type,
                methods,
            },
            summary,
        }
    }
}

/// Flatten per-member parts into the grouped member order of the class.
fn assemble(
    parts: Vec<MemberParts>,
) -> (Vec<ImplementationMember>, Vec<DslMethod>, Vec<BehaviorSummary>) {
    let mut storage = Vec::new();
    let mut counters = Vec::new();
    let mut overrides = Vec::new();
    let mut configures = Vec::new();
    let mut methods = Vec::new();
    let mut summary = Vec::new();
    for part in parts {
        storage.extend(part.storage.into_iter().map(ImplementationMember::BehaviorStorage));
        counters.extend(part.counters.into_iter().map(ImplementationMember::CallCounter));
        overrides.extend(part.overrides.into_iter().map(ImplementationMember::Override));
        configures.extend(part.configures.into_iter().map(ImplementationMember::Configure));
        methods.extend(part.dsl);
        summary.extend(part.summary);
    }
    let mut members = storage;
    members.extend(counters);
    members.extend(overrides);
    members.extend(configures);
    (members, methods, summary)
}

/// Import every classifier the signatures and bounds reference.
///
/// A classifier whose simple name is already taken is left for the
/// renderer to qualify.
fn collect_imports(analysis: &DeclarationAnalysis, imports: &mut ImportCollector) {
    let mut add = |ty: &ResolvedType| {
        for classifier in ty.classifiers() {
            imports.import_or_qualify(&classifier.package, classifier.import_name());
        }
    };
    let bounds = |params: &[TypeParameterDescriptor]| {
        params
            .iter()
            .flat_map(|p| &p.bounds)
            .filter_map(|b| match b {
                TypeBound::Resolved(ty) => Some(ty.clone()),
                TypeBound::Textual(_) => None,
            })
            .collect::<Vec<_>>()
    };

    for ty in bounds(&analysis.type_parameters) {
        add(&ty);
    }
    for member in analysis.members() {
        match member {
            Member::Function(function) => {
                for ty in bounds(&function.type_parameters) {
                    add(&ty);
                }
                function.signature_types().for_each(&mut add);
            }
            Member::Property(property) => add(&property.ty),
        }
    }
}
