//! Generic pattern classification and type-parameter scoping.
//!
//! Behavior storage is a field of the generated class, so it can only name
//! type parameters that are in scope on the class. Class-level parameters
//! are (the generated class redeclares them); method-level ones are not.
//! Each member therefore gets one of two [`ScopingStrategy`]s.

use fakegen_ir::{
    DeclarationAnalysis, FunctionAnalysis, GenericPattern, ResolvedType, TypeParameterScope,
};
use serde::Serialize;
use tracing::debug;

use crate::session::AnalysisSession;

/// Classify the generic shape of a declaration.
pub fn classify(analysis: &DeclarationAnalysis) -> GenericPattern {
    let class_level = !analysis.type_parameters.is_empty();
    let method_level = analysis.functions.iter().any(FunctionAnalysis::is_generic);
    match (class_level, method_level) {
        (false, false) => GenericPattern::NoGenerics,
        (true, false) => GenericPattern::ClassLevelGenerics,
        (false, true) => GenericPattern::MethodLevelGenerics,
        (true, true) => GenericPattern::MixedGenerics,
    }
}

impl AnalysisSession {
    /// The generic pattern of `analysis`, classified at most once per session.
    pub fn generic_pattern(&self, analysis: &DeclarationAnalysis) -> GenericPattern {
        let key = analysis.qualified_name();
        self.pattern_or_insert_with(&key, || {
            let pattern = classify(analysis);
            debug!(declaration = %key, %pattern, "classified generic pattern");
            pattern
        })
    }
}

/// How a member's behavior storage refers to type parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopingStrategy {
    /// Storage names class-level parameters directly. The generated class,
    /// factory and DSL redeclare them, so no cast is needed.
    Preserving,
    /// Method-level parameters are erased to `Any?` in storage. The override
    /// casts the stored result back where the parameter is in scope.
    DynamicErasure,
}

impl ScopingStrategy {
    /// Pick the strategy for one function of a declaration with `pattern`.
    pub fn for_function(pattern: GenericPattern, function: &FunctionAnalysis) -> Self {
        if pattern.erases_method_parameters() && function.mentions_method_type_parameters() {
            Self::DynamicErasure
        } else {
            Self::Preserving
        }
    }

    /// Map a signature type to the type used in behavior storage.
    ///
    /// Erasure walks the type structurally: only method-scoped parameter
    /// references are replaced, so class-level names and unrelated
    /// classifiers that happen to share a name are left alone.
    pub fn storage_type(self, ty: &ResolvedType) -> ResolvedType {
        match self {
            Self::Preserving => ty.clone(),
            Self::DynamicErasure => ty.substitute(&|_, scope| {
                (scope == TypeParameterScope::Method).then(ResolvedType::nullable_any)
            }),
        }
    }

    /// Whether values crossing the storage boundary need unchecked casts.
    pub fn needs_unchecked_cast(self) -> bool {
        matches!(self, Self::DynamicErasure)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Preserving => "preserving",
            Self::DynamicErasure => "dynamic erasure",
        }
    }
}

impl std::fmt::Display for ScopingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use fakegen_ir::{
        Classifier, ParameterAnalysis, TargetKind, TypeArgument, TypeParameterDescriptor,
    };

    use super::*;
    use crate::render::TypeRenderer;

    fn function(name: &str, type_params: &[&str], param: ResolvedType, ret: ResolvedType) -> FunctionAnalysis {
        FunctionAnalysis {
            name: name.to_string(),
            parameters: vec![ParameterAnalysis {
                name: "x".to_string(),
                ty: param,
                is_vararg: false,
            }],
            return_type: ret,
            is_suspend: false,
            is_operator: false,
            is_infix: false,
            extension_receiver: None,
            type_parameters: type_params
                .iter()
                .map(|n| TypeParameterDescriptor::new(*n, TypeParameterScope::Method))
                .collect(),
            is_abstract: true,
        }
    }

    fn declaration(class_params: &[&str], functions: Vec<FunctionAnalysis>) -> DeclarationAnalysis {
        let mut analysis = DeclarationAnalysis::new("Repo", "com.example", TargetKind::Interface);
        for p in class_params {
            analysis = analysis
                .with_type_parameter(TypeParameterDescriptor::new(*p, TypeParameterScope::Class));
        }
        for f in functions {
            analysis.functions.push(f);
        }
        analysis
    }

    fn string() -> ResolvedType {
        ResolvedType::builtin("kotlin", "String")
    }

    #[test]
    fn test_classify_all_patterns() {
        let plain = function("get", &[], string(), string());
        let generic = function(
            "map",
            &["R"],
            string(),
            ResolvedType::type_parameter("R", TypeParameterScope::Method),
        );

        assert_eq!(classify(&declaration(&[], vec![plain.clone()])), GenericPattern::NoGenerics);
        assert_eq!(
            classify(&declaration(&["T"], vec![plain.clone()])),
            GenericPattern::ClassLevelGenerics
        );
        assert_eq!(
            classify(&declaration(&[], vec![plain.clone(), generic.clone()])),
            GenericPattern::MethodLevelGenerics
        );
        assert_eq!(
            classify(&declaration(&["T"], vec![generic])),
            GenericPattern::MixedGenerics
        );
    }

    #[test]
    fn test_session_memoizes_classification() {
        let session = AnalysisSession::new();
        let analysis = declaration(&["T"], vec![]);

        assert!(!session.is_classified("com.example.Repo"));
        assert_eq!(session.generic_pattern(&analysis), GenericPattern::ClassLevelGenerics);
        assert_eq!(session.generic_pattern(&analysis), GenericPattern::ClassLevelGenerics);
        assert_eq!(session.stats().classifications, 1);
    }

    #[test]
    fn test_strategy_selection() {
        let t_class = ResolvedType::type_parameter("T", TypeParameterScope::Class);
        let r_method = ResolvedType::type_parameter("R", TypeParameterScope::Method);

        let preserving = function("save", &[], t_class.clone(), t_class.clone());
        assert_eq!(
            ScopingStrategy::for_function(GenericPattern::MixedGenerics, &preserving),
            ScopingStrategy::Preserving
        );

        let erasing = function("map", &["R"], t_class, r_method);
        assert_eq!(
            ScopingStrategy::for_function(GenericPattern::MixedGenerics, &erasing),
            ScopingStrategy::DynamicErasure
        );
    }

    #[test]
    fn test_mixed_erasure_is_structural() {
        let session = AnalysisSession::new();
        let renderer = TypeRenderer::new(&session);

        // fun <R> transform(x: T): Map<T, R?>
        let ty = ResolvedType::class(
            Classifier::builtin("kotlin.collections", "Map"),
            vec![
                TypeArgument::invariant(ResolvedType::type_parameter("T", TypeParameterScope::Class)),
                TypeArgument::invariant(
                    ResolvedType::type_parameter("R", TypeParameterScope::Method).nullable(),
                ),
            ],
        );
        let erased = ScopingStrategy::DynamicErasure.storage_type(&ty);
        assert_eq!(renderer.render(&erased, true), "Map<T, Any?>");

        let kept = ScopingStrategy::Preserving.storage_type(&ty);
        assert_eq!(renderer.render(&kept, true), "Map<T, R?>");
    }

    #[test]
    fn test_erasure_ignores_classifier_named_like_parameter() {
        let session = AnalysisSession::new();
        let renderer = TypeRenderer::new(&session);

        // A class literally named `R` next to a method-level `R`
        let ty = ResolvedType::builtin_generic(
            "kotlin.collections",
            "List",
            vec![ResolvedType::class(Classifier::unresolved("R"), vec![])],
        );
        let erased = ScopingStrategy::DynamicErasure.storage_type(&ty);
        assert_eq!(renderer.render(&erased, true), "List<R>");
    }
}
