use crate::BaseInfo;
use alloc::{boxed::Box, collections::BTreeMap, vec::Vec};

/// Error type used when a [`Repository`] could not be updated or queried.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum RepositoryError {
    /// The namespace was not defined.
    #[non_exhaustive]
    NamespaceNotFound {
        #[allow(missing_docs)]
        namespace: Box<str>,
    },
    /// A namespace was required or defined with a version different from the loaded one.
    #[non_exhaustive]
    VersionConflict {
        #[allow(missing_docs)]
        namespace: Box<str>,
        /// The version that is already loaded.
        loaded: Box<str>,
        #[allow(missing_docs)]
        requested: Box<str>,
    },
    /// A descriptor was added to a namespace other than its own.
    #[non_exhaustive]
    NamespaceMismatch {
        #[allow(missing_docs)]
        namespace: Box<str>,
        #[allow(missing_docs)]
        info: BaseInfo,
    },
    /// A namespace already contains a descriptor with the same name.
    #[non_exhaustive]
    DuplicateInfo {
        #[allow(missing_docs)]
        info: BaseInfo,
    },
}

impl core::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NamespaceNotFound { namespace } => {
                write!(f, "typelib file for namespace '{namespace}' not found")
            }
            Self::VersionConflict {
                namespace,
                loaded,
                requested,
            } => write!(
                f,
                "requiring namespace '{namespace}' version '{requested}', but '{loaded}' is already loaded"
            ),
            Self::NamespaceMismatch { namespace, info } => {
                write!(f, "{info} cannot be added to namespace '{namespace}'")
            }
            Self::DuplicateInfo { info } => write!(f, "{info} is already defined"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RepositoryError {}

/// The descriptors of a single namespace, at a specific version.
#[derive(Debug)]
pub struct Namespace {
    version: Box<str>,
    infos: Vec<BaseInfo>,
}

impl Namespace {
    #[allow(missing_docs)]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The descriptors of the namespace, in the order they were defined.
    pub fn infos(&self) -> &[BaseInfo] {
        &self.infos
    }

    /// Finds a descriptor by name.
    pub fn find(&self, name: &str) -> Option<&BaseInfo> {
        self.infos.iter().find(|info| info.name() == name)
    }
}

/// Contains the descriptors for all loaded namespaces.
#[derive(Debug, Default)]
pub struct Repository {
    namespaces: BTreeMap<Box<str>, Namespace>,
}

impl Repository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds descriptors to a `namespace` with the given `version`.
    ///
    /// Defining more descriptors for a namespace that is already loaded is allowed, as long as
    /// the versions match.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace was already loaded with a different version, if a
    /// descriptor belongs to another namespace, or if a descriptor with the same name already
    /// exists. The repository is left unchanged when an error is returned.
    pub fn define<I>(
        &mut self,
        namespace: &str,
        version: &str,
        infos: I,
    ) -> Result<(), RepositoryError>
    where
        I: IntoIterator<Item = BaseInfo>,
    {
        let infos = infos.into_iter().collect::<Vec<_>>();

        if let Some(existing) = self.namespaces.get(namespace) {
            if *existing.version != *version {
                return Err(RepositoryError::VersionConflict {
                    namespace: namespace.into(),
                    loaded: existing.version.clone(),
                    requested: version.into(),
                });
            }
        }

        for (i, info) in infos.iter().enumerate() {
            if info.namespace() != namespace {
                return Err(RepositoryError::NamespaceMismatch {
                    namespace: namespace.into(),
                    info: info.clone(),
                });
            }

            let defined_earlier = infos[..i].iter().any(|other| other.name() == info.name());
            let already_loaded = self
                .namespaces
                .get(namespace)
                .is_some_and(|existing| existing.find(info.name()).is_some());

            if defined_earlier || already_loaded {
                return Err(RepositoryError::DuplicateInfo { info: info.clone() });
            }
        }

        self.namespaces
            .entry(namespace.into())
            .or_insert_with(|| Namespace {
                version: version.into(),
                infos: Vec::new(),
            })
            .infos
            .extend(infos);

        Ok(())
    }

    /// Gets a loaded namespace, checking its version if one is specified.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace is not loaded, or is loaded with a different version.
    pub fn require(
        &self,
        namespace: &str,
        version: Option<&str>,
    ) -> Result<&Namespace, RepositoryError> {
        let loaded = self
            .namespaces
            .get(namespace)
            .ok_or_else(|| RepositoryError::NamespaceNotFound {
                namespace: namespace.into(),
            })?;

        match version {
            Some(version) if *loaded.version != *version => Err(RepositoryError::VersionConflict {
                namespace: namespace.into(),
                loaded: loaded.version.clone(),
                requested: version.into(),
            }),
            _ => Ok(loaded),
        }
    }

    /// Finds a descriptor by `namespace` and `name`.
    pub fn find(&self, namespace: &str, name: &str) -> Option<BaseInfo> {
        self.namespaces.get(namespace)?.find(name).cloned()
    }

    /// The descriptors of a namespace, or an empty slice if it is not loaded.
    pub fn infos(&self, namespace: &str) -> &[BaseInfo] {
        self.namespaces
            .get(namespace)
            .map(Namespace::infos)
            .unwrap_or_default()
    }

    /// The version of a loaded namespace.
    pub fn version(&self, namespace: &str) -> Option<&str> {
        self.namespaces.get(namespace).map(Namespace::version)
    }

    /// Iterates over the names of the loaded namespaces, in sorted order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> + '_ {
        self.namespaces.keys().map(AsRef::as_ref)
    }
}
