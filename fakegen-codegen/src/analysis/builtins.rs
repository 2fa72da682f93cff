//! Well-known Kotlin classifiers, by simple name.

/// `(simple name, package)` for every built-in the resolver knows.
const BUILTINS: &[(&str, &str)] = &[
    // kotlin
    ("Any", "kotlin"),
    ("Nothing", "kotlin"),
    ("Unit", "kotlin"),
    ("String", "kotlin"),
    ("CharSequence", "kotlin"),
    ("Int", "kotlin"),
    ("Long", "kotlin"),
    ("Short", "kotlin"),
    ("Byte", "kotlin"),
    ("Double", "kotlin"),
    ("Float", "kotlin"),
    ("Boolean", "kotlin"),
    ("Char", "kotlin"),
    ("Number", "kotlin"),
    ("Comparable", "kotlin"),
    ("Throwable", "kotlin"),
    ("Exception", "kotlin"),
    ("Pair", "kotlin"),
    ("Triple", "kotlin"),
    ("Result", "kotlin"),
    ("Array", "kotlin"),
    ("IntArray", "kotlin"),
    ("LongArray", "kotlin"),
    ("ShortArray", "kotlin"),
    ("ByteArray", "kotlin"),
    ("DoubleArray", "kotlin"),
    ("FloatArray", "kotlin"),
    ("BooleanArray", "kotlin"),
    ("CharArray", "kotlin"),
    // kotlin.collections
    ("List", "kotlin.collections"),
    ("MutableList", "kotlin.collections"),
    ("Set", "kotlin.collections"),
    ("MutableSet", "kotlin.collections"),
    ("Map", "kotlin.collections"),
    ("MutableMap", "kotlin.collections"),
    ("Collection", "kotlin.collections"),
    ("MutableCollection", "kotlin.collections"),
    ("Iterable", "kotlin.collections"),
    ("Iterator", "kotlin.collections"),
    ("ArrayList", "kotlin.collections"),
    ("HashMap", "kotlin.collections"),
    ("HashSet", "kotlin.collections"),
    ("LinkedHashMap", "kotlin.collections"),
    ("LinkedHashSet", "kotlin.collections"),
    // kotlin.sequences
    ("Sequence", "kotlin.sequences"),
    // kotlinx.coroutines.flow
    ("Flow", "kotlinx.coroutines.flow"),
    ("StateFlow", "kotlinx.coroutines.flow"),
    ("MutableStateFlow", "kotlinx.coroutines.flow"),
    ("SharedFlow", "kotlinx.coroutines.flow"),
    ("MutableSharedFlow", "kotlinx.coroutines.flow"),
];

/// Package of a built-in classifier. Nested names (`Map.Entry`) are looked
/// up by their outermost segment.
pub fn builtin_package(name: &str) -> Option<&'static str> {
    let outer = name.split('.').next().unwrap_or(name);
    BUILTINS
        .iter()
        .find(|(simple, _)| *simple == outer)
        .map(|(_, package)| *package)
}

/// Element type name of a primitive array (`Int` -> `IntArray`).
pub fn primitive_array(element: &str) -> Option<&'static str> {
    Some(match element {
        "kotlin.Int" => "IntArray",
        "kotlin.Long" => "LongArray",
        "kotlin.Short" => "ShortArray",
        "kotlin.Byte" => "ByteArray",
        "kotlin.Double" => "DoubleArray",
        "kotlin.Float" => "FloatArray",
        "kotlin.Boolean" => "BooleanArray",
        "kotlin.Char" => "CharArray",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_package() {
        assert_eq!(builtin_package("String"), Some("kotlin"));
        assert_eq!(builtin_package("MutableMap"), Some("kotlin.collections"));
        assert_eq!(builtin_package("Map.Entry"), Some("kotlin.collections"));
        assert_eq!(builtin_package("StateFlow"), Some("kotlinx.coroutines.flow"));
        assert_eq!(builtin_package("User"), None);
    }

    #[test]
    fn test_primitive_array() {
        assert_eq!(primitive_array("kotlin.Int"), Some("IntArray"));
        assert_eq!(primitive_array("kotlin.String"), None);
    }
}
