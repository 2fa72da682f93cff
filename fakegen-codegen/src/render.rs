//! Type rendering.
//!
//! Turns a [`ResolvedType`] into Kotlin type text. Renders are memoized in
//! the [`AnalysisSession`] per (occurrence, mode), so rendering the same
//! occurrence again is a map lookup.

use std::collections::BTreeSet;

use fakegen_ir::{
    FunctionType, ResolvedType, TypeArgument, TypeBound, TypeKind, TypeParameterDescriptor,
};
use tracing::trace;

use crate::session::AnalysisSession;

/// The universal top type that erased type parameters render to.
pub const TOP_TYPE: &str = "Any?";

static NOTHING_QUALIFIED: BTreeSet<String> = BTreeSet::new();

/// Renders resolved types as Kotlin type expressions.
#[derive(Debug, Clone, Copy)]
pub struct TypeRenderer<'s> {
    session: &'s AnalysisSession,
    /// `package.Name` of classifiers written fully qualified.
    qualified: &'s BTreeSet<String>,
}

impl<'s> TypeRenderer<'s> {
    pub fn new(session: &'s AnalysisSession) -> Self {
        Self {
            session,
            qualified: &NOTHING_QUALIFIED,
        }
    }

    /// A renderer that writes the classifiers in `qualified` by their fully
    /// qualified name. Such renders are not memoized.
    pub fn qualifying<'a>(self, qualified: &'a BTreeSet<String>) -> TypeRenderer<'a>
    where
        's: 'a,
    {
        TypeRenderer {
            session: self.session,
            qualified,
        }
    }

    /// Render `ty`. Type parameters keep their names when
    /// `preserve_type_parameters` is set and become [`TOP_TYPE`] otherwise.
    ///
    /// Never fails: unknown classifiers render by their simple name.
    pub fn render(&self, ty: &ResolvedType, preserve_type_parameters: bool) -> String {
        if !self.qualified.is_empty() {
            return self.compute(ty, preserve_type_parameters);
        }
        let occurrence = ty.occurrence();
        if let Some(text) = self.session.cached_render(occurrence, preserve_type_parameters) {
            return text;
        }
        let text = self.compute(ty, preserve_type_parameters);
        trace!(occurrence = occurrence.get(), preserve = preserve_type_parameters, %text, "rendered type");
        self.session
            .store_render(occurrence, preserve_type_parameters, &text);
        text
    }

    /// Render a type parameter for a declaration header: `T`, or `T : Bound`
    /// when it has exactly one bound. Variance is dropped.
    pub fn render_parameter_inline(&self, param: &TypeParameterDescriptor) -> String {
        match param.bounds.as_slice() {
            [bound] => format!("{} : {}", param.name, self.render_bound(bound)),
            _ => param.name.clone(),
        }
    }

    /// Render a bound as written in a header or `where` clause.
    pub fn render_bound(&self, bound: &TypeBound) -> String {
        match bound {
            TypeBound::Resolved(ty) => self.render(ty, true),
            TypeBound::Textual(text) => text.clone(),
        }
    }

    fn compute(&self, ty: &ResolvedType, preserve: bool) -> String {
        match &ty.kind {
            TypeKind::TypeParameter { name, .. } => {
                if !preserve {
                    return TOP_TYPE.to_string();
                }
                with_nullability(name.clone(), ty.nullable)
            }
            TypeKind::Class {
                classifier,
                arguments,
            } => {
                let name = if classifier.name.is_empty() {
                    // Nothing better is known about this occurrence
                    "Any".to_string()
                } else if !classifier.package.is_empty()
                    && self.qualified.contains(&format!(
                        "{}.{}",
                        classifier.package,
                        classifier.import_name()
                    ))
                {
                    classifier.qualified_name()
                } else {
                    classifier.name.clone()
                };
                let text = if arguments.is_empty() {
                    name
                } else {
                    let args: Vec<String> = arguments
                        .iter()
                        .map(|arg| self.render_argument(arg, preserve))
                        .collect();
                    format!("{}<{}>", name, args.join(", "))
                };
                with_nullability(text, ty.nullable)
            }
            TypeKind::Function(function) => {
                let text = self.render_function(function, preserve);
                if ty.nullable {
                    format!("({text})?")
                } else {
                    text
                }
            }
        }
    }

    fn render_argument(&self, arg: &TypeArgument, preserve: bool) -> String {
        match arg {
            TypeArgument::Star => "*".to_string(),
            TypeArgument::Type { variance, ty } => match variance.keyword() {
                Some(keyword) => format!("{} {}", keyword, self.render(ty, preserve)),
                None => self.render(ty, preserve),
            },
        }
    }

    fn render_function(&self, function: &FunctionType, preserve: bool) -> String {
        let params: Vec<String> = function
            .parameters
            .iter()
            .map(|p| self.render(p, preserve))
            .collect();
        let mut text = String::new();
        if function.is_suspend {
            text.push_str("suspend ");
        }
        if let Some(receiver) = &function.receiver {
            let receiver_text = self.render(receiver, preserve);
            if receiver.as_function().is_some() && !receiver.nullable {
                text.push_str(&format!("({receiver_text})."));
            } else {
                text.push_str(&receiver_text);
                text.push('.');
            }
        }
        text.push_str(&format!(
            "({}) -> {}",
            params.join(", "),
            self.render(&function.return_type, preserve)
        ));
        text
    }
}

fn with_nullability(text: String, nullable: bool) -> String {
    if nullable && !text.ends_with('?') {
        format!("{text}?")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use fakegen_ir::{
        Classifier, ClassifierOrigin, TypeParameterScope, Variance,
    };

    use super::*;

    fn string() -> ResolvedType {
        ResolvedType::builtin("kotlin", "String")
    }

    fn int() -> ResolvedType {
        ResolvedType::builtin("kotlin", "Int")
    }

    fn t(scope: TypeParameterScope) -> ResolvedType {
        ResolvedType::type_parameter("T", scope)
    }

    #[test]
    fn test_render_simple_and_nullable() {
        let session = AnalysisSession::new();
        let renderer = TypeRenderer::new(&session);

        assert_eq!(renderer.render(&string(), true), "String");
        assert_eq!(renderer.render(&string().nullable(), true), "String?");
    }

    #[test]
    fn test_render_generic_class() {
        let session = AnalysisSession::new();
        let renderer = TypeRenderer::new(&session);

        let map = ResolvedType::builtin_generic(
            "kotlin.collections",
            "Map",
            vec![string(), ResolvedType::builtin_generic("kotlin.collections", "List", vec![int()])],
        );
        assert_eq!(renderer.render(&map, true), "Map<String, List<Int>>");
    }

    #[test]
    fn test_render_projections_and_star() {
        let session = AnalysisSession::new();
        let renderer = TypeRenderer::new(&session);

        let ty = ResolvedType::class(
            Classifier::builtin("kotlin.collections", "Map"),
            vec![
                TypeArgument::Star,
                TypeArgument::Type {
                    variance: Variance::Covariant,
                    ty: t(TypeParameterScope::Class),
                },
            ],
        );
        assert_eq!(renderer.render(&ty, true), "Map<*, out T>");
        assert_eq!(renderer.render(&ty, false), "Map<*, out Any?>");
    }

    #[test]
    fn test_render_type_parameter_modes() {
        let session = AnalysisSession::new();
        let renderer = TypeRenderer::new(&session);

        let nullable_t = t(TypeParameterScope::Method).nullable();
        assert_eq!(renderer.render(&nullable_t, true), "T?");
        assert_eq!(renderer.render(&nullable_t, false), "Any?");
        assert_eq!(renderer.render(&t(TypeParameterScope::Class), false), "Any?");
    }

    #[test]
    fn test_render_function_types() {
        let session = AnalysisSession::new();
        let renderer = TypeRenderer::new(&session);

        let plain = ResolvedType::function(vec![string(), int()], ResolvedType::unit());
        assert_eq!(renderer.render(&plain, true), "(String, Int) -> Unit");
        assert_eq!(renderer.render(&plain.nullable(), true), "((String, Int) -> Unit)?");

        let suspending = ResolvedType::new(
            TypeKind::Function(FunctionType {
                receiver: Some(Box::new(string())),
                parameters: vec![int()],
                return_type: Box::new(string().nullable()),
                is_suspend: true,
            }),
            true,
        );
        assert_eq!(
            renderer.render(&suspending, true),
            "(suspend String.(Int) -> String?)?"
        );
    }

    #[test]
    fn test_render_function_receiver_is_parenthesized() {
        let session = AnalysisSession::new();
        let renderer = TypeRenderer::new(&session);

        let receiver = ResolvedType::function(vec![], int());
        let ty = ResolvedType::new(
            TypeKind::Function(FunctionType {
                receiver: Some(Box::new(receiver)),
                parameters: vec![],
                return_type: Box::new(ResolvedType::unit()),
                is_suspend: false,
            }),
            false,
        );
        assert_eq!(renderer.render(&ty, true), "(() -> Int).() -> Unit");
    }

    #[test]
    fn test_render_function_parameter_of_function_type() {
        let session = AnalysisSession::new();
        let renderer = TypeRenderer::new(&session);

        let block = ResolvedType::function(vec![], t(TypeParameterScope::Method));
        let ty = ResolvedType::function(vec![block], t(TypeParameterScope::Method));
        assert_eq!(renderer.render(&ty, true), "(() -> T) -> T");
        assert_eq!(renderer.render(&ty, false), "(() -> Any?) -> Any?");
    }

    #[test]
    fn test_unresolved_classifier_degrades_to_name() {
        let session = AnalysisSession::new();
        let renderer = TypeRenderer::new(&session);

        let unknown = ResolvedType::class(Classifier::unresolved("Widget"), vec![]);
        assert_eq!(renderer.render(&unknown, true), "Widget");

        let nameless = ResolvedType::class(
            Classifier::new("", "", ClassifierOrigin::Unresolved),
            vec![],
        );
        assert_eq!(renderer.render(&nameless, true), "Any");
    }

    #[test]
    fn test_render_is_memoized_per_occurrence_and_mode() {
        let session = AnalysisSession::new();
        let renderer = TypeRenderer::new(&session);
        let list = ResolvedType::builtin_generic("kotlin.collections", "List", vec![string()]);

        renderer.render(&list, true);
        let after_first = session.stats();
        renderer.render(&list, true);
        let after_second = session.stats();

        assert_eq!(after_second.render_misses, after_first.render_misses);
        assert_eq!(after_second.render_hits, after_first.render_hits + 1);

        renderer.render(&list, false);
        assert!(session.stats().render_misses > after_second.render_misses);
    }

    #[test]
    fn test_render_parameter_inline() {
        let session = AnalysisSession::new();
        let renderer = TypeRenderer::new(&session);

        let bounded = TypeParameterDescriptor::new("T", TypeParameterScope::Class)
            .with_bound(TypeBound::Resolved(ResolvedType::builtin_generic(
                "kotlin",
                "Comparable",
                vec![t(TypeParameterScope::Class)],
            )))
            .with_variance(Variance::Covariant);
        assert_eq!(renderer.render_parameter_inline(&bounded), "T : Comparable<T>");

        let multi = TypeParameterDescriptor::new("K", TypeParameterScope::Method)
            .with_bound(TypeBound::Textual("CharSequence".to_string()))
            .with_bound(TypeBound::Textual("Comparable<K>".to_string()));
        assert_eq!(renderer.render_parameter_inline(&multi), "K");
    }

    #[test]
    fn test_render_qualified_classifiers() {
        let session = AnalysisSession::new();
        let qualified = BTreeSet::from(["com.b.User".to_string()]);
        let renderer = TypeRenderer::new(&session).qualifying(&qualified);

        let user = |package: &str| {
            ResolvedType::class(Classifier::new(package, "User", ClassifierOrigin::Qualified), vec![])
        };
        let pair = ResolvedType::builtin_generic("kotlin", "Pair", vec![user("com.a"), user("com.b")]);
        assert_eq!(renderer.render(&pair, true), "Pair<User, com.b.User>");
        assert_eq!(session.stats().render_misses, 0);
    }
}
