//! Origin-set reconciler.
//!
//! Converges the declared origin list against the unordered remote set
//! belonging to one resource. Matching is by exact IP equality — a
//! surrogate id does not exist until the server creates the origin, so the
//! IP is the only identity available up front.

use tracing::{debug, info};

use l7sync_sdk::l7origin;

use crate::diff::merge_origin;
use crate::error::ConvergeError;
use crate::model::OriginSpec;
use crate::remote::RemoteApi;

/// One planned step against the remote origin set.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// No remote origin carries this IP yet.
    Create(OriginSpec),
    /// A remote origin matches by IP but differs in some field; carries the
    /// full record the update call should send (declared values for changed
    /// fields, remote values for the rest).
    Update(l7origin::Item),
    /// A remote origin matches by IP and nothing differs.
    Keep(l7origin::Item),
    /// The remote origin's IP is absent from the declared list.
    Delete(l7origin::Item),
}

/// Split declared vs remote into an ordered action list: one
/// create/update/keep per declared entry in declaration order, then one
/// delete per remote straggler in listing order.
pub fn plan(desired: &[OriginSpec], remote: &[l7origin::Item]) -> Vec<Action> {
    let mut actions = Vec::with_capacity(desired.len());

    for spec in desired {
        match remote.iter().find(|item| item.ip == spec.ip) {
            None => actions.push(Action::Create(spec.clone())),
            Some(item) => {
                let (merged, changed) = merge_origin(item, spec);
                if changed {
                    actions.push(Action::Update(merged));
                } else {
                    actions.push(Action::Keep(merged));
                }
            }
        }
    }

    for item in remote {
        if !desired.iter().any(|spec| spec.ip == item.ip) {
            actions.push(Action::Delete(item.clone()));
        }
    }

    actions
}

/// Converge the remote origin set of one resource and return the surviving
/// origins, re-read by surrogate id for authoritative timestamps.
///
/// One list call covers all matching for the pass. Each surviving origin
/// costs one extra read at the end; mutations happen strictly in plan
/// order, one call at a time.
pub async fn reconcile<A: RemoteApi>(
    api: &A,
    l7_resource_id: i64,
    desired: &[OriginSpec],
) -> Result<Vec<l7origin::Item>, ConvergeError> {
    let remote = api.list_origins(l7_resource_id).await?;
    debug!(
        l7_resource_id,
        remote = remote.len(),
        desired = desired.len(),
        "reconciling origins"
    );

    // Surrogate ids of the origins that remain after this pass, in
    // declaration order.
    let mut surviving = Vec::with_capacity(desired.len());

    for action in plan(desired, &remote) {
        match action {
            Action::Create(spec) => {
                info!(ip = %spec.ip, "creating origin");
                let mut created = api
                    .create_origin(&l7origin::CreateOpts {
                        l7_resource_id,
                        ip: spec.ip.clone(),
                        weight: spec.weight,
                        mode: spec.mode.clone(),
                    })
                    .await?;
                created.l7_resource_id = l7_resource_id;

                // The server may normalize fields on creation; correct the
                // fresh record the same way a matched one would be.
                let (merged, changed) = merge_origin(&created, &spec);
                if changed {
                    api.update_origin(&merged).await?;
                }
                surviving.push(created.id);
            }
            Action::Update(merged) => {
                info!(ip = %merged.ip, id = merged.id, "updating origin");
                api.update_origin(&merged).await?;
                surviving.push(merged.id);
            }
            Action::Keep(item) => {
                debug!(ip = %item.ip, id = item.id, "origin unchanged");
                surviving.push(item.id);
            }
            Action::Delete(item) => {
                info!(ip = %item.ip, id = item.id, "deleting origin");
                let marker = api.delete_origin(l7_resource_id, item.id).await?;
                if marker != "ok" {
                    return Err(ConvergeError::DeleteRejected(format!(
                        "origin {} (id {}): got {marker:?}",
                        item.ip, item.id
                    )));
                }
            }
        }
    }

    let mut converged = Vec::with_capacity(surviving.len());
    for id in surviving {
        let mut item = api.get_origin(l7_resource_id, id).await?;
        // Some responses omit the back-reference; pin it.
        item.l7_resource_id = l7_resource_id;
        converged.push(item);
    }

    Ok(converged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote_origin(id: i64, ip: &str, weight: i64) -> l7origin::Item {
        l7origin::Item {
            l7_resource_id: 1234,
            id,
            ip: ip.into(),
            weight,
            ..Default::default()
        }
    }

    fn declared(ip: &str, weight: Option<i64>) -> OriginSpec {
        OriginSpec {
            ip: ip.into(),
            weight,
            mode: None,
        }
    }

    #[test]
    fn plan_splits_create_update_delete() {
        let remote = vec![remote_origin(1, "10.0.0.1", 50), remote_origin(2, "10.0.0.2", 50)];
        let desired = vec![declared("10.0.0.1", Some(10)), declared("10.0.0.3", Some(5))];

        let actions = plan(&desired, &remote);
        assert_eq!(actions.len(), 3);
        assert!(matches!(&actions[0], Action::Update(item) if item.id == 1 && item.weight == 10));
        assert!(matches!(&actions[1], Action::Create(spec) if spec.ip == "10.0.0.3"));
        assert!(matches!(&actions[2], Action::Delete(item) if item.id == 2));
    }

    #[test]
    fn plan_keeps_unchanged_matches() {
        let remote = vec![remote_origin(1, "10.0.0.1", 50)];
        let desired = vec![declared("10.0.0.1", Some(50))];

        let actions = plan(&desired, &remote);
        assert_eq!(actions.len(), 1);
        assert!(matches!(&actions[0], Action::Keep(item) if item.id == 1));
    }

    #[test]
    fn plan_on_empty_remote_is_all_creates() {
        let desired = vec![declared("10.0.0.1", None), declared("10.0.0.2", None)];

        let actions = plan(&desired, &[]);
        assert_eq!(actions.len(), 2);
        assert!(actions
            .iter()
            .all(|action| matches!(action, Action::Create(_))));
    }

    #[test]
    fn plan_follows_declaration_order() {
        let remote = vec![remote_origin(7, "10.0.0.2", 50)];
        let desired = vec![declared("10.0.0.1", None), declared("10.0.0.2", Some(10))];

        let actions = plan(&desired, &remote);
        assert!(matches!(&actions[0], Action::Create(spec) if spec.ip == "10.0.0.1"));
        assert!(matches!(&actions[1], Action::Update(item) if item.id == 7));
    }

    #[test]
    fn undeclared_weight_does_not_trigger_update() {
        let remote = vec![remote_origin(1, "10.0.0.1", 50)];
        let desired = vec![declared("10.0.0.1", None)];

        let actions = plan(&desired, &remote);
        assert!(matches!(&actions[0], Action::Keep(_)));
    }
}
