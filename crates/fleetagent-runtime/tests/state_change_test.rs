//! End-to-end tests for state-change reporting.
//!
//! These tests drive live tasks and containers the way the agent does and
//! check what the reporting side sees:
//! 1. Rendering reflects the live object at render time
//! 2. Dropped objects degrade to the metadata-free rendering
//! 3. Wire requests omit unset optional fields
//! 4. Rendering is safe while another thread mutates the task

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use fleetagent_common::attachment::EniAttachment;
use fleetagent_common::types::{
    AttachmentStatus, ContainerStatus, ManagedAgentStateChange, NetworkBinding, TaskStatus,
    TransportProtocol,
};
use fleetagent_runtime::container::Container;
use fleetagent_runtime::events;
use fleetagent_runtime::task::Task;
use fleetagent_statechange::wire::{
    SubmitAttachmentStateChangesRequest, SubmitContainerStateChangeRequest,
    SubmitTaskStateChangeRequest,
};

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, hour, minute, 0)
        .single()
        .unwrap()
}

fn sample_task() -> Arc<Task> {
    Arc::new(
        Task::new("arn:aws:ecs:us-west-2:123456789012:task/default/abc")
            .with_container(Container::new("web", true).with_image_digest("sha256:1111"))
            .with_container(Container::new("log-router", false)),
    )
}

// ── Lazy metadata ───────────────────────────────────────────────────

#[test]
fn rendering_reflects_sent_status_at_render_time() {
    let task = sample_task();
    let web = task.container("web").unwrap();
    web.set_runtime_id("d0c4e7");
    web.set_known_status(ContainerStatus::Running);

    let change = events::container_state_change(task.arn(), web);
    assert!(change.render().ends_with(
        "containerKnownSentStatus=NONE containerRuntimeID=d0c4e7 containerIsEssential=true"
    ));

    web.mark_sent(ContainerStatus::Running);
    assert!(change.render().contains("containerKnownSentStatus=RUNNING"));
}

#[test]
fn task_metadata_picks_up_late_timestamps() {
    let task = sample_task();
    task.set_known_status(TaskStatus::Pulled);
    let change = events::task_state_change(&task, None);
    assert!(change.render().contains("PullStoppedAt: 1970-01-01 00:00:00 UTC"));

    let stopped = at(8, 30);
    task.set_pull_stopped_at(stopped);
    assert!(change.render().contains("PullStoppedAt: 2026-10-01 08:30:00 UTC"));
    assert_eq!(change.pull_stopped_at(), None, "event fields are a snapshot");
}

// ── Dropped objects ─────────────────────────────────────────────────

#[test]
fn dropped_task_falls_back_to_plain_rendering() {
    let task = sample_task();
    task.set_known_status(TaskStatus::Running);
    let web = task.container("web").unwrap();
    web.set_known_status(ContainerStatus::Running);

    let change = events::task_state_change(&task, None);
    drop(task);

    assert_eq!(
        change.render(),
        "arn:aws:ecs:us-west-2:123456789012:task/default/abc -> RUNNING, \
         container change: containerName=web containerStatus=RUNNING"
    );
}

// ── Wire mapping ────────────────────────────────────────────────────

#[test]
fn stopped_task_maps_to_complete_request() {
    let expires = at(9, 0);
    let attachment = Arc::new(EniAttachment::new(
        "arn:aws:ecs:us-west-2:123456789012:task/default/abc",
        "arn:aws:ecs:us-west-2:123456789012:attachment/eni-1",
        "0a:1b:2c:3d:4e:5f",
        expires,
    ));
    attachment.set_status(AttachmentStatus::Attached);
    let task = Arc::new(
        Task::new("arn:aws:ecs:us-west-2:123456789012:task/default/abc")
            .with_container(Container::new("web", true))
            .with_attachment(Arc::clone(&attachment)),
    );

    let web = task.container("web").unwrap();
    web.set_known_status(ContainerStatus::Stopped);
    web.set_exited(0, None);
    web.set_network_bindings(vec![NetworkBinding {
        bind_ip: "0.0.0.0".into(),
        container_port: 80,
        host_port: 32768,
        protocol: TransportProtocol::Tcp,
        ..NetworkBinding::default()
    }]);
    task.record_managed_agent_change(ManagedAgentStateChange {
        task_arn: task.arn().into(),
        container_name: "web".into(),
        managed_agent_name: "ExecuteCommandAgent".into(),
        status: "STOPPED".into(),
        reason: None,
    });
    task.set_known_status(TaskStatus::Stopped);

    let change = events::task_state_change(&task, Some("Essential container in task exited"));
    let request = SubmitTaskStateChangeRequest::from_change("default", &change);
    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(json["status"], "STOPPED");
    assert_eq!(json["containers"][0]["exitCode"], 0);
    assert_eq!(json["containers"][0]["networkBindings"][0]["hostPort"], 32768);
    assert_eq!(json["containers"][0]["networkBindings"][0]["bindIP"], "0.0.0.0");
    assert_eq!(json["managedAgents"][0]["status"], "STOPPED");
    assert_eq!(json["attachments"][0]["status"], "ATTACHED");
    assert!(json.get("pullStartedAt").is_none());
    assert!(json["containers"][0].get("runtimeId").is_none());

    let rendered = change.render();
    let attachment_at = rendered.find("ENI Attachment").unwrap();
    let container_at = rendered.find("container change").unwrap();
    let agent_at = rendered.find("managed agent").unwrap();
    assert!(attachment_at < container_at && container_at < agent_at);
}

#[test]
fn container_request_keeps_exit_code_absent_while_running() {
    let task = sample_task();
    let web = task.container("web").unwrap();
    web.set_known_status(ContainerStatus::Running);
    web.set_exited(1, Some("stale".into()));

    let change = events::container_state_change(task.arn(), web);
    let json =
        serde_json::to_value(SubmitContainerStateChangeRequest::from_change("default", &change))
            .unwrap();
    assert!(json.get("exitCode").is_none());
    assert_eq!(json["reason"], "stale");
}

#[test]
fn attachment_request_tracks_status() {
    let expires = at(9, 0);
    let attachment = Arc::new(EniAttachment::new(
        "arn:task",
        "arn:eni",
        "0a:1b:2c:3d:4e:5f",
        expires,
    ));
    attachment.set_status(AttachmentStatus::Attached);
    let change = events::attachment_state_change(&attachment);
    let request = SubmitAttachmentStateChangesRequest::from_change("default", &change).unwrap();
    assert_eq!(request.attachments[0].status, "ATTACHED");
}

// ── Concurrency ─────────────────────────────────────────────────────

#[test]
fn rendering_while_task_is_mutated() {
    let task = sample_task();
    task.set_known_status(TaskStatus::Running);
    for container in task.containers() {
        container.set_known_status(ContainerStatus::Running);
    }
    let change = events::task_state_change(&task, None);

    std::thread::scope(|scope| {
        let writer = Arc::clone(&task);
        let _ = scope.spawn(move || {
            for minute in 0..50 {
                writer.set_pull_started_at(at(10, minute % 60));
                writer.mark_sent(TaskStatus::Running);
                for container in writer.containers() {
                    container.mark_sent(ContainerStatus::Running);
                }
            }
        });
        let _ = scope.spawn(|| {
            for _ in 0..50 {
                let rendered = change.render();
                assert!(rendered.starts_with(
                    "arn:aws:ecs:us-west-2:123456789012:task/default/abc -> RUNNING"
                ));
            }
        });
    });

    assert!(change.render().contains("Known Sent: RUNNING"));
}
