use figment::{
    Error, Metadata, Profile, Provider,
    error::Kind,
    providers::{Env, Format, Toml},
    value::{Dict, Map, Value},
};
use std::path::PathBuf;

/// Provides the `[profile.<name>]` table of the config file as the data of profile `<name>`.
///
/// The file path is read from an env var if set, and then the file must exist. Otherwise the
/// default path is used and a missing file provides nothing.
#[derive(Clone, Debug)]
pub(crate) struct ProfileTable {
    path: PathBuf,
    required: bool,
    profile: Profile,
}

impl ProfileTable {
    pub(crate) fn new(env_var: &str, default: PathBuf, profile: Profile) -> Self {
        match Env::var(env_var) {
            Some(path) => Self { path: path.into(), required: true, profile },
            None => Self { path: default, required: false, profile },
        }
    }
}

impl Provider for ProfileTable {
    fn metadata(&self) -> Metadata {
        Toml::file(&self.path).nested().metadata()
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        if self.required && !self.path.exists() {
            let path = self.path.display();
            return Err(Error::from(format!("config file `{path}` does not exist")));
        }

        let mut tables = Toml::file(&self.path).nested().data()?;
        let table = tables
            .remove(&Profile::new(crate::Config::PROFILE_SECTION))
            .and_then(|mut profiles| profiles.remove(self.profile.as_str().as_str()));
        match table {
            None => Ok(Map::new()),
            Some(Value::Dict(_, dict)) => Ok(self.profile.collect(dict)),
            Some(value) => {
                let mut err = Error::from(Kind::InvalidType(value.to_actual(), "table".into()));
                err.metadata = Some(self.metadata());
                err.profile = Some(self.profile.clone());
                Err(err)
            }
        }
    }

    fn profile(&self) -> Option<Profile> {
        Some(self.profile.clone())
    }
}
