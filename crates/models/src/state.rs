use serde::{Deserialize, Serialize};

use crate::base::{lenient, strip_keys, BaseFields, Extra, RESERVED_FIELDS};
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct State {
    #[serde(flatten)]
    pub base: BaseFields,
    pub name: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Create payload for `POST /states`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewState {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl NewState {
    pub fn into_state(self) -> Result<State, ModelError> {
        let name = self.name.ok_or(ModelError::Missing("name"))?;
        let mut extra = self.extra;
        strip_keys(&mut extra, RESERVED_FIELDS);
        Ok(State { base: BaseFields::new(), name, extra })
    }
}

/// Partial update for `PUT /states/{id}`; only `name` is typed.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct StatePatch {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl StatePatch {
    pub const IGNORED: &'static [&'static str] = RESERVED_FIELDS;

    pub fn apply(self, state: &mut State) {
        if let Some(name) = self.name {
            state.name = name;
        }
        let mut extra = self.extra;
        strip_keys(&mut extra, Self::IGNORED);
        state.extra.extend(extra);
        state.base.touch();
    }
}
