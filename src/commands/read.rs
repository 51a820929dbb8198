/// `read` command: secret values by `op://` reference.
use opshim::{OpClient, OpError, Runner};

use crate::cli::OutputCtx;
use crate::cli::args::ReadArgs;
use crate::cli::output::write_secrets;
use crate::types::SecretOutput;

/// Run `opshim read <reference>...`.
///
/// A single reference goes through `op read`; several are batched into one
/// `op inject` call and printed in the order given.
///
/// # Errors
///
/// Returns `OpError` if any reference cannot be read; nothing is printed then.
pub fn run<R: Runner>(args: &ReadArgs, client: &OpClient<R>, ctx: &OutputCtx) -> Result<(), OpError> {
    let output = if let [reference] = args.references.as_slice() {
        vec![SecretOutput {
            reference: reference.clone(),
            value: client.read(reference)?,
        }]
    } else {
        let values = client.read_multi(&args.references)?;
        args.references
            .iter()
            .map(|reference| SecretOutput {
                value: values.get(reference).cloned().unwrap_or_default(),
                reference: reference.clone(),
            })
            .collect()
    };

    write_secrets(&output, ctx);
    Ok(())
}
