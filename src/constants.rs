//! Well-known attribute names and values.
//!
//! The engine itself treats every attribute name as opaque; these names are
//! the conventional ones used by JVM ecosystems and appear in tests, fixtures
//! and configuration examples.

/// What a variant is for: compiling against it, running with it, ...
pub const USAGE: &str = "org.gradle.usage";

/// Kind of component a variant represents (library, platform, documentation).
pub const CATEGORY: &str = "org.gradle.category";

/// Release status of the component.
pub const STATUS: &str = "org.gradle.status";

/// Minimal JVM version a variant targets.
pub const JVM_VERSION: &str = "org.gradle.jvm.version";

/// Packaging of library elements (jar, classes, resources).
pub const LIBRARY_ELEMENTS: &str = "org.gradle.libraryelements";

/// Usage values.
pub mod usage {
    /// Compile-time API
    pub const JAVA_API: &str = "java-api";
    /// Runtime classpath
    pub const JAVA_RUNTIME: &str = "java-runtime";
}

/// Category values.
pub mod category {
    /// A regular library
    pub const LIBRARY: &str = "library";
    /// A platform (bill of materials)
    pub const PLATFORM: &str = "platform";
}

/// Status values, lowest first.
pub const STATUS_ORDER: [&str; 3] = ["integration", "milestone", "release"];
