//! The `eyre` report handler of the `oxie` binary.

use eyre::EyreHandler;
use std::{error::Error, fmt};

const BUG_REPORT: &str = "This is a bug. Consider reporting it at https://github.com/oxie-nft/oxie";

/// Returns the messages of `error` and its sources.
///
/// A cause already contained in the message before it is skipped, so
/// `failed to connect: user rejected` is not followed by `user rejected`.
pub fn causes(error: &(dyn Error + 'static)) -> Vec<String> {
    let mut causes = Vec::<String>::new();
    let mut next = Some(error);
    while let Some(err) = next {
        let message = err.to_string().trim().to_string();
        if !causes.last().is_some_and(|last| last.contains(&message)) {
            causes.push(message);
        }
        next = err.source();
    }
    causes
}

/// Reports an error as its message followed by its distinct causes.
///
/// With `OXIE_DEBUG` set, reports are rendered by `color-eyre` instead.
#[derive(Default)]
pub struct Handler {
    color: Option<Box<dyn EyreHandler>>,
}

impl EyreHandler for Handler {
    fn display(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&causes(error).join("; "))
    }

    fn debug(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(color) = &self.color {
            return color.debug(error, f);
        }

        let causes = causes(error);
        let Some((message, causes)) = causes.split_first() else { return Ok(()) };
        f.write_str(message)?;
        match causes {
            [] => Ok(()),
            [cause] => write!(f, "\n\nCaused by: {cause}"),
            causes => {
                f.write_str("\n\nCaused by:")?;
                for cause in causes {
                    write!(f, "\n  - {cause}")?;
                }
                Ok(())
            }
        }
    }

    fn track_caller(&mut self, location: &'static std::panic::Location<'static>) {
        if let Some(color) = &mut self.color {
            color.track_caller(location);
        }
    }
}

/// Installs the panic hook and the [`Handler`] as the global `eyre` hook.
pub fn install() {
    let (panic_hook, eyre_hook) =
        color_eyre::config::HookBuilder::default().panic_section(BUG_REPORT).into_hooks();
    panic_hook.install();

    let eyre_hook = eyre_hook.into_eyre_hook();
    let debug = std::env::var_os("OXIE_DEBUG").is_some();
    let installed = eyre::set_hook(Box::new(move |err| {
        Box::new(Handler { color: debug.then(|| eyre_hook(err)) })
    }));
    if let Err(err) = installed {
        debug!(%err, "eyre hook already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(thiserror::Error, Debug)]
    #[error("failed to connect wallet: {0}")]
    struct Connect(#[source] Rpc);

    #[derive(thiserror::Error, Debug)]
    #[error("{0}")]
    struct Rpc(&'static str);

    #[derive(thiserror::Error, Debug)]
    #[error("mint failed")]
    struct Mint(#[source] Rpc);

    struct Report<'a>(&'a (dyn Error + 'static));

    impl fmt::Debug for Report<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            Handler::default().debug(self.0, f)
        }
    }

    impl fmt::Display for Report<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            Handler::default().display(self.0, f)
        }
    }

    #[test]
    fn skips_contained_causes() {
        let err = Connect(Rpc("user rejected"));
        assert_eq!(causes(&err), ["failed to connect wallet: user rejected"]);
        assert_eq!(format!("{:?}", Report(&err)), "failed to connect wallet: user rejected");
    }

    #[test]
    fn reports_single_cause() {
        let err = Mint(Rpc("Transaction reverted on-chain"));
        assert_eq!(
            format!("{:?}", Report(&err)),
            "mint failed\n\nCaused by: Transaction reverted on-chain"
        );
        assert_eq!(Report(&err).to_string(), "mint failed; Transaction reverted on-chain");
    }

    #[test]
    fn reports_cause_list() {
        let err = eyre::eyre!("connection refused")
            .wrap_err("could not read totalSupply()")
            .wrap_err("watch stopped");
        let err: &(dyn Error + 'static) = err.as_ref();
        assert_eq!(
            format!("{:?}", Report(err)),
            "watch stopped\n\nCaused by:\n  - could not read totalSupply()\n  - connection refused"
        );
    }
}
