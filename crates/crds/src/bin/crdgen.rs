//! Prints every provider CRD as a multi-document YAML stream.
//!
//! ```sh
//! cargo run -p crds --bin crdgen > config/crd/newrelic.yaml
//! ```

use crds::{AlertsPolicy, Dashboard, NrqlAlertCondition, ProviderConfig};
use kube::CustomResourceExt;

fn main() -> anyhow::Result<()> {
    let crds = [
        ProviderConfig::crd(),
        AlertsPolicy::crd(),
        NrqlAlertCondition::crd(),
        Dashboard::crd(),
    ];

    for crd in crds {
        println!("---");
        print!("{}", serde_yaml::to_string(&crd)?);
    }

    Ok(())
}
