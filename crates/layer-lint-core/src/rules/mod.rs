//! Conformance rules.
//!
//! Each rule is an independent, stateless check over the extracted
//! packages and the dependency graph.
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | ISOLATION001 | `domain-isolation` | Domain packages import only domain packages |
//! | LAYER001 | `layer-direction` | Imports follow the allowed dependency table |
//! | CYCLE001 | `import-cycle` | No import cycles between packages |
//! | IMMUT001 | `value-object-immutability` | Value objects expose no fields |
//! | CONTRACT001 | `repository-contract` | Repository methods take a context and return an error |
//! | PURITY001 | `service-purity` | Services do not reach into persistence |

mod contracts;
mod cycles;
mod direction;
mod immutability;
mod isolation;
mod purity;

pub use contracts::RepositoryContract;
pub use cycles::ImportCycle;
pub use direction::LayerDirection;
pub use immutability::ValueObjectImmutability;
pub use isolation::DomainIsolation;
pub use purity::ServicePurity;

use crate::config::{Config, TypeRef};
use crate::extractor::TypeDecl;
use crate::graph::{DependencyGraph, ImportResolver};
use crate::layer::{path_contains, LayerClassifier};
use crate::package::{PackageInfo, ROOT_PACKAGE};
use crate::types::{Violation, ViolationKind};

/// Everything a rule may inspect. All inputs are immutable.
pub struct RuleContext<'a> {
    /// Active configuration.
    pub config: &'a Config,
    /// Extracted packages, sorted by path.
    pub packages: &'a [PackageInfo],
    /// In-project dependency graph.
    pub graph: &'a DependencyGraph,
    /// Import categorisation.
    pub resolver: &'a ImportResolver,
    /// Layer classifier, for import strings.
    pub classifier: &'a LayerClassifier,
}

impl<'a> RuleContext<'a> {
    /// Finds every declaration matching a type identifier, with its file.
    ///
    /// A package part under the module path (`github.com/acme/shop/domain`)
    /// names one package; any other package part is a segment pattern.
    #[must_use]
    pub fn find_types(&self, target: &TypeRef) -> Vec<(&'a PackageInfo, &'a TypeDecl)> {
        self.packages
            .iter()
            .filter(|pkg| {
                target
                    .package
                    .as_deref()
                    .map_or(true, |p| self.package_matches(pkg, p))
            })
            .filter_map(|pkg| pkg.find_type(&target.name).map(|t| (pkg, t)))
            .collect()
    }

    fn package_matches(&self, pkg: &PackageInfo, pattern: &str) -> bool {
        match self.resolver.module_relative(pattern) {
            Some(rel) => {
                rel == pkg.package_dir
                    || (pkg.package_dir != ROOT_PACKAGE
                        && rel.ends_with(&format!("/{}", pkg.package_dir)))
            }
            None => path_contains(&pkg.package_dir, pattern),
        }
    }
}

/// A project-wide conformance rule.
pub trait ConformanceRule: Send + Sync {
    /// The violation family this rule produces.
    fn kind(&self) -> ViolationKind;

    /// Returns the kebab-case name of this rule.
    fn name(&self) -> &'static str {
        self.kind().rule_name()
    }

    /// Returns the rule code.
    fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str;

    /// Checks every package and returns all violations found.
    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Violation>;
}

/// Type alias for boxed rule trait objects.
pub type RuleBox = Box<dyn ConformanceRule>;

/// All built-in rules, in reporting order.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(DomainIsolation),
        Box::new(LayerDirection),
        Box::new(ImportCycle),
        Box::new(ValueObjectImmutability),
        Box::new(RepositoryContract),
        Box::new(ServicePurity),
    ]
}

/// Looks a rule up by name or code.
#[must_use]
pub fn rule_by_name(name: &str) -> Option<RuleBox> {
    all_rules()
        .into_iter()
        .find(|r| r.name() == name || r.code().eq_ignore_ascii_case(name))
}
