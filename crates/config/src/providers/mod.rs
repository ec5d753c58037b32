//! Config providers used to assemble the [`Config`](crate::Config) figment.

mod ext;
pub(crate) use ext::ProfileTable;
