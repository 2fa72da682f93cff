//! Member analysis: manifest declarations to [`DeclarationAnalysis`].

use fakegen_ir::{
    DeclarationAnalysis, FunctionAnalysis, MemberAnalysis, ParameterAnalysis, PropertyAnalysis,
    ShapeCatalog, TargetKind, TypeBound, TypeParameterDescriptor, TypeParameterScope, Variance,
};
use fakegen_manifest::{
    DeclarationDef, MemberDef, MemberKind, MemberOrigin, Modifier, TypeParameterDef, VarianceDef,
};
use tracing::{debug, trace};

use super::resolve::{NameResolver, Scope};

/// Why a manifest member does not appear in the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Inherited or synthetic; only declared members are faked.
    NotDeclared,
    /// A final member of a class target cannot be overridden.
    Final,
}

impl Exclusion {
    /// Whether a member is excluded from analysis, and why.
    pub fn of(member: &MemberDef, target: TargetKind) -> Option<Self> {
        if member.origin != MemberOrigin::Declared {
            return Some(Self::NotDeclared);
        }
        let overridable =
            member.has_modifier(Modifier::Abstract) || member.has_modifier(Modifier::Open);
        if target == TargetKind::Class && !overridable {
            return Some(Self::Final);
        }
        None
    }
}

/// Walks a declaration's members in source order and records their shape.
#[derive(Debug, Clone, Copy)]
pub struct MemberAnalyzer<'a> {
    resolver: NameResolver<'a>,
}

impl<'a> MemberAnalyzer<'a> {
    pub fn new(shapes: &'a ShapeCatalog) -> Self {
        Self {
            resolver: NameResolver::new(shapes),
        }
    }

    /// Analyze one declaration.
    ///
    /// Assumes the declaration passed validation; members the validation
    /// phase reports as unsupported never reach this point.
    pub fn analyze(&self, declaration: &DeclarationDef) -> DeclarationAnalysis {
        let target = if declaration.kind.is_interface_like() {
            TargetKind::Interface
        } else {
            TargetKind::Class
        };
        let mut analysis =
            DeclarationAnalysis::new(declaration.name(), &declaration.package, target);

        let class_names: Vec<String> = declaration
            .type_parameters
            .iter()
            .map(|p| p.name.get_ref().clone())
            .collect();
        let scope = Scope {
            package: &declaration.package,
            imports: &declaration.imports,
            class_parameters: &class_names,
            method_parameters: &[],
        };

        analysis.type_parameters = declaration
            .type_parameters
            .iter()
            .map(|p| self.type_parameter(p, TypeParameterScope::Class, &scope))
            .collect();

        for member in &declaration.members {
            if let Some(exclusion) = Exclusion::of(member, target) {
                debug!(
                    declaration = declaration.name(),
                    member = member.name(),
                    ?exclusion,
                    "member excluded"
                );
                continue;
            }
            let analyzed = match member.kind {
                MemberKind::Function => {
                    MemberAnalysis::Function(self.function(member, target, &scope))
                }
                MemberKind::Property => {
                    MemberAnalysis::Property(self.property(member, target, &scope))
                }
            };
            trace!(member = analyzed.name(), "analyzed member");
            analysis.push(analyzed);
        }

        debug!(
            declaration = %analysis.qualified_name(),
            functions = analysis.functions.len(),
            properties = analysis.properties.len(),
            "analyzed declaration"
        );
        analysis
    }

    fn type_parameter(
        &self,
        param: &TypeParameterDef,
        scope_tag: TypeParameterScope,
        scope: &Scope<'_>,
    ) -> TypeParameterDescriptor {
        let mut descriptor = TypeParameterDescriptor::new(param.name.get_ref(), scope_tag)
            .with_variance(match param.variance {
                VarianceDef::Invariant => Variance::Invariant,
                VarianceDef::Out => Variance::Covariant,
                VarianceDef::In => Variance::Contravariant,
            });
        for bound in &param.bounds {
            descriptor = descriptor
                .with_bound(TypeBound::Resolved(self.resolver.resolve(bound.expr(), scope)));
        }
        descriptor
    }

    fn function(
        &self,
        member: &MemberDef,
        target: TargetKind,
        scope: &Scope<'_>,
    ) -> FunctionAnalysis {
        let method_names: Vec<String> = member
            .type_parameters
            .iter()
            .map(|p| p.name.get_ref().clone())
            .collect();
        let scope = scope.with_method_parameters(&method_names);

        let type_parameters = member
            .type_parameters
            .iter()
            .map(|p| self.type_parameter(p, TypeParameterScope::Method, &scope))
            .collect();
        let parameters = member
            .parameters
            .iter()
            .map(|p| ParameterAnalysis {
                name: p.name.get_ref().clone(),
                ty: self.resolver.resolve(p.ty.expr(), &scope),
                is_vararg: p.vararg,
            })
            .collect();
        let return_type = match &member.returns {
            Some(returns) => self.resolver.resolve(returns.expr(), &scope),
            None => fakegen_ir::ResolvedType::unit(),
        };
        let extension_receiver = member
            .receiver
            .as_ref()
            .map(|r| self.resolver.resolve(r.expr(), &scope));

        // An open extension member cannot reach its super implementation
        // from generated code, so it is faked like an abstract one.
        let is_abstract = match target {
            TargetKind::Interface => true,
            TargetKind::Class => {
                member.has_modifier(Modifier::Abstract) || extension_receiver.is_some()
            }
        };

        FunctionAnalysis {
            name: member.name().to_string(),
            parameters,
            return_type,
            is_suspend: member.has_modifier(Modifier::Suspend),
            is_operator: member.has_modifier(Modifier::Operator),
            is_infix: member.has_modifier(Modifier::Infix),
            extension_receiver,
            type_parameters,
            is_abstract,
        }
    }

    fn property(
        &self,
        member: &MemberDef,
        target: TargetKind,
        scope: &Scope<'_>,
    ) -> PropertyAnalysis {
        let ty = match &member.ty {
            Some(ty) => self.resolver.resolve(ty.expr(), scope),
            // Validation rejects properties without a type
            None => fakegen_ir::ResolvedType::unit(),
        };
        PropertyAnalysis {
            name: member.name().to_string(),
            ty,
            is_mutable: member.mutable,
            is_abstract: target == TargetKind::Interface || member.has_modifier(Modifier::Abstract),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use fakegen_ir::ClassifierOrigin;
    use fakegen_manifest::Manifest;

    use super::*;
    use crate::analysis::build_shapes;

    fn analyze(src: &str) -> DeclarationAnalysis {
        let manifest = Manifest::from_str(src).expect("manifest should parse");
        let shapes = build_shapes(&manifest);
        MemberAnalyzer::new(&shapes).analyze(&manifest.declarations[0])
    }

    #[test]
    fn test_function_modifiers_and_order() {
        let analysis = analyze(
            r#"
            [project]
            name = "test"

            [[declarations]]
            name = "Repo"
            package = "com.example"

            [[declarations.members]]
            kind = "function"
            name = "save"
            modifiers = ["suspend"]
            parameters = [{ name = "items", type = "String", vararg = true }]

            [[declarations.members]]
            kind = "property"
            name = "count"
            type = "Int"
            mutable = true

            [[declarations.members]]
            kind = "function"
            name = "plus"
            modifiers = ["operator"]
            receiver = "String"
            parameters = [{ name = "other", type = "Int" }]
            returns = "String"
            "#,
        );

        assert_eq!(analysis.target, TargetKind::Interface);
        let names: Vec<_> = analysis.members().map(|m| m.name()).collect();
        assert_eq!(names, vec!["count", "save", "plus"]);

        let save = &analysis.functions[0];
        assert!(save.is_suspend);
        assert!(save.return_type.is_unit());
        assert!(save.vararg_parameter().is_some());

        let plus = &analysis.functions[1];
        assert!(plus.is_operator);
        assert!(plus.extension_receiver.as_ref().unwrap().is_class("kotlin.String"));

        assert!(analysis.properties[0].is_mutable);
    }

    #[test]
    fn test_excludes_inherited_and_final_members() {
        let analysis = analyze(
            r#"
            [project]
            name = "test"

            [[declarations]]
            name = "Service"
            kind = "abstract-class"

            [[declarations.members]]
            kind = "function"
            name = "run"
            modifiers = ["abstract"]

            [[declarations.members]]
            kind = "function"
            name = "stop"
            modifiers = ["open"]

            [[declarations.members]]
            kind = "function"
            name = "helper"

            [[declarations.members]]
            kind = "function"
            name = "toString"
            modifiers = ["open"]
            origin = "inherited"
            returns = "String"
            "#,
        );

        assert_eq!(analysis.target, TargetKind::Class);
        let names: Vec<_> = analysis.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["run", "stop"]);
        assert!(analysis.functions[0].is_abstract);
        assert!(!analysis.functions[1].is_abstract);
    }

    #[test]
    fn test_type_parameter_scopes() {
        let analysis = analyze(
            r#"
            [project]
            name = "test"

            [[declarations]]
            name = "Cache"
            package = "com.example"
            type_parameters = [{ name = "K", bounds = ["Comparable<K>"], variance = "in" }]

            [[declarations.members]]
            kind = "function"
            name = "getOrPut"
            type_parameters = [{ name = "V" }]
            parameters = [{ name = "key", type = "K" }, { name = "compute", type = "() -> V" }]
            returns = "V"
            "#,
        );

        let k = &analysis.type_parameters[0];
        assert_eq!(k.scope, TypeParameterScope::Class);
        assert_eq!(k.variance, Variance::Contravariant);
        assert_eq!(k.bounds.len(), 1);

        let function = &analysis.functions[0];
        assert_eq!(function.type_parameters[0].scope, TypeParameterScope::Method);
        assert_eq!(
            function.parameters[0].ty.as_type_parameter(),
            Some(("K", TypeParameterScope::Class))
        );
        assert_eq!(
            function.return_type.as_type_parameter(),
            Some(("V", TypeParameterScope::Method))
        );
        assert!(function.mentions_method_type_parameters());
    }

    #[test]
    fn test_open_extension_on_class_is_abstract() {
        let analysis = analyze(
            r#"
            [project]
            name = "test"

            [[declarations]]
            name = "Formatter"
            kind = "open-class"

            [[declarations.members]]
            kind = "function"
            name = "shout"
            modifiers = ["open"]
            receiver = "String"
            returns = "String"
            "#,
        );
        assert!(analysis.functions[0].is_abstract);
    }

    #[test]
    fn test_shape_references_resolve_to_shapes() {
        let analysis = analyze(
            r#"
            [project]
            name = "test"

            [[shapes]]
            name = "User"
            package = "com.example.model"
            fields = [{ name = "id", type = "String" }]

            [[declarations]]
            name = "Users"
            package = "com.example"

            [[declarations.members]]
            kind = "property"
            name = "current"
            type = "User"
            "#,
        );
        let classifier = analysis.properties[0].ty.classifier().unwrap();
        assert_eq!(classifier.origin, ClassifierOrigin::Shape);
        assert_eq!(classifier.qualified_name(), "com.example.model.User");
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let src = r#"
            [project]
            name = "test"

            [[declarations]]
            name = "Repo"
            type_parameters = [{ name = "T" }]

            [[declarations.members]]
            kind = "function"
            name = "find"
            parameters = [{ name = "id", type = "String" }]
            returns = "T?"

            [[declarations.members]]
            kind = "property"
            name = "all"
            type = "List<T>"
        "#;
        assert_eq!(analyze(src), analyze(src));
    }
}
