//! Versioned response schema.
//!
//! A response is either `{"version": 1, "object": <WireObject>}` or an error
//! envelope `{"error": <message>, "kind": <kind>}`. Decoding checks the whole
//! tree (version, kinds, titles, paths, parent/child shape, badges, job
//! states) before any model object is built, so a hostile payload can never
//! produce a half-valid graph.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use objrt_model::{
    Badge, BatchSystem, Endpoint, Icon, Job, JobState, ObjectHeader,
    ObjectKind, ObjectPath, Partition, RuntimeNode, SchedulerHost,
    validate_title,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ErrorKind, Result, RuntimeError};

pub const WIRE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct WireResponse {
    version: u32,
    object: WireObject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireObject {
    #[serde(flatten)]
    pub detail: WireDetail,
    pub title: String,
    pub path: String,
    /// Base64 (standard alphabet, padded) image bytes.
    pub icon: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    /// `""` when there is no badge.
    pub badge: String,
    #[serde(default)]
    pub children: Vec<WireObject>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WireDetail {
    BatchSystem {
        scheduler_host: String,
        scheduler_port: u16,
    },
    Partition {
        job_count: u64,
    },
    Job {
        job_id: String,
        state: String,
    },
}

impl WireDetail {
    fn kind(&self) -> ObjectKind {
        match self {
            WireDetail::BatchSystem { .. } => ObjectKind::BatchSystem,
            WireDetail::Partition { .. } => ObjectKind::Partition,
            WireDetail::Job { .. } => ObjectKind::Job,
        }
    }
}

/// Error envelope. `kind` is optional on decode; an unknown or missing kind
/// is surfaced as a generic remote failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>, kind: Option<ErrorKind>) -> Self {
        Self {
            error: error.into(),
            kind: kind.map(|kind| kind.as_str().to_string()),
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.kind.as_deref().and_then(ErrorKind::parse)
    }

    pub fn into_error(self) -> RuntimeError {
        RuntimeError::Remote {
            kind: self.error_kind().unwrap_or(ErrorKind::Internal),
            message: self.error,
        }
    }
}

impl From<&RuntimeError> for ErrorEnvelope {
    fn from(err: &RuntimeError) -> Self {
        ErrorEnvelope::new(err.to_string(), Some(err.kind()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Object(RuntimeNode),
    Error(ErrorEnvelope),
}

impl Response {
    /// Turns an envelope into the error it reports.
    pub fn into_result(self) -> Result<RuntimeNode> {
        match self {
            Response::Object(node) => Ok(node),
            Response::Error(envelope) => Err(envelope.into_error()),
        }
    }
}

pub fn encode_object(node: &RuntimeNode) -> Result<Vec<u8>> {
    let response = WireResponse {
        version: WIRE_VERSION,
        object: to_wire(node),
    };
    Ok(serde_json::to_vec(&response)?)
}

pub fn encode_error(envelope: &ErrorEnvelope) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(envelope)?)
}

pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let value: Value = serde_json::from_slice(bytes)?;
    let Value::Object(fields) = &value else {
        return Err(invalid("response must be a JSON object"));
    };

    if fields.contains_key("error") {
        let envelope: ErrorEnvelope = serde_json::from_value(value)?;
        return Ok(Response::Error(envelope));
    }

    match fields.get("version").and_then(Value::as_u64) {
        Some(version) if version == u64::from(WIRE_VERSION) => {}
        Some(version) => {
            return Err(invalid(format!("unsupported wire version {version}")));
        }
        None => return Err(invalid("response is missing `version`")),
    }

    let response: WireResponse = serde_json::from_value(value)?;
    decode_root(response.object).map(Response::Object)
}

fn to_wire(node: &RuntimeNode) -> WireObject {
    match node {
        RuntimeNode::BatchSystem(system) => batch_system_to_wire(system),
        RuntimeNode::Partition(partition) => partition_to_wire(partition),
        RuntimeNode::Job(job) => job_to_wire(job),
    }
}

fn wire_object(
    header: &ObjectHeader,
    badge: Badge,
    detail: WireDetail,
    children: Vec<WireObject>,
) -> WireObject {
    WireObject {
        detail,
        title: header.title().to_string(),
        path: header.path().to_string(),
        icon: STANDARD.encode(header.icon().as_bytes()),
        host: header.origin().map(|origin| origin.host.clone()),
        port: header.origin().map(|origin| origin.port),
        badge: badge.as_str().to_string(),
        children,
    }
}

fn batch_system_to_wire(system: &BatchSystem) -> WireObject {
    wire_object(
        system.header(),
        system.badge(),
        WireDetail::BatchSystem {
            scheduler_host: system.scheduler().host.clone(),
            scheduler_port: system.scheduler().port,
        },
        system.partitions().iter().map(partition_to_wire).collect(),
    )
}

fn partition_to_wire(partition: &Partition) -> WireObject {
    wire_object(
        partition.header(),
        partition.badge(),
        WireDetail::Partition {
            job_count: partition.job_count(),
        },
        partition.jobs().iter().map(job_to_wire).collect(),
    )
}

fn job_to_wire(job: &Job) -> WireObject {
    wire_object(
        job.header(),
        job.badge(),
        WireDetail::Job {
            job_id: job.job_id().to_string(),
            state: job.state().to_string(),
        },
        Vec::new(),
    )
}

fn invalid(message: impl Into<String>) -> RuntimeError {
    RuntimeError::Serialization(message.into())
}

/// Validated identity of one wire object, ready to become a header.
struct CheckedHeader {
    title: String,
    path: ObjectPath,
    icon: Icon,
    origin: Option<Endpoint>,
}

impl CheckedHeader {
    fn into_header(self, kind: ObjectKind) -> ObjectHeader {
        ObjectHeader::new(kind, self.title, self.path)
            .with_icon(self.icon)
            .with_origin(self.origin)
    }
}

fn check_header(
    object: &WireObject,
    parent: Option<&ObjectPath>,
) -> Result<CheckedHeader> {
    let kind = object.detail.kind();
    validate_title(&object.title)
        .map_err(|err| invalid(format!("{kind} at `{}`: {err}", object.path)))?;

    let path = ObjectPath::parse(&object.path)
        .map_err(|err| invalid(format!("{kind} `{}`: {err}", object.title)))?;

    let expected_depth = kind as usize + 1;
    if path.depth() != expected_depth {
        return Err(invalid(format!(
            "{kind} path `{path}` must have {expected_depth} segment(s)"
        )));
    }

    match parent {
        Some(parent) => {
            let expected = parent
                .child(&object.title)
                .map_err(|err| invalid(err.to_string()))?;
            if path != expected {
                return Err(invalid(format!(
                    "child path `{path}` does not match `{expected}`"
                )));
            }
        }
        None if kind != ObjectKind::BatchSystem
            && path.last_segment() != object.title =>
        {
            return Err(invalid(format!(
                "{kind} title `{}` does not match path `{path}`",
                object.title
            )));
        }
        None => {}
    }

    let icon = STANDARD
        .decode(object.icon.as_bytes())
        .map(Icon::from_bytes)
        .map_err(|err| {
            invalid(format!("icon of `{path}` is not base64: {err}"))
        })?;

    let origin = match (&object.host, object.port) {
        (Some(host), Some(port)) => Some(Endpoint::new(host.clone(), port)),
        (None, None) => None,
        _ => {
            return Err(invalid(format!(
                "`{path}` must carry both host and port or neither"
            )));
        }
    };

    Ok(CheckedHeader {
        title: object.title.clone(),
        path,
        icon,
        origin,
    })
}

fn check_badge(path: &ObjectPath, actual: &str, expected: Badge) -> Result<()> {
    if actual != expected.as_str() {
        return Err(invalid(format!(
            "badge `{actual}` of `{path}` does not match `{}`",
            expected.as_str()
        )));
    }
    Ok(())
}

fn decode_root(object: WireObject) -> Result<RuntimeNode> {
    match object.detail.kind() {
        ObjectKind::BatchSystem => {
            decode_batch_system(object).map(RuntimeNode::BatchSystem)
        }
        ObjectKind::Partition => {
            decode_partition(object, None).map(RuntimeNode::Partition)
        }
        ObjectKind::Job => decode_job(object, None).map(RuntimeNode::Job),
    }
}

fn decode_batch_system(object: WireObject) -> Result<BatchSystem> {
    let checked = check_header(&object, None)?;
    let WireDetail::BatchSystem {
        scheduler_host,
        scheduler_port,
    } = object.detail
    else {
        return Err(invalid("expected a batch system"));
    };

    let partitions = object
        .children
        .into_iter()
        .map(|child| {
            expect_kind(&child, ObjectKind::Partition, &checked.path)?;
            decode_partition(child, Some(&checked.path))
        })
        .collect::<Result<Vec<_>>>()?;

    check_badge(
        &checked.path,
        &object.badge,
        Badge::count(partitions.len() as u64),
    )?;

    Ok(BatchSystem::new(
        checked.into_header(ObjectKind::BatchSystem),
        SchedulerHost::new(scheduler_host, scheduler_port),
        partitions,
    ))
}

fn decode_partition(
    object: WireObject,
    parent: Option<&ObjectPath>,
) -> Result<Partition> {
    let checked = check_header(&object, parent)?;
    let WireDetail::Partition { job_count } = object.detail else {
        return Err(invalid("expected a partition"));
    };
    check_badge(&checked.path, &object.badge, Badge::count(job_count))?;

    let jobs = object
        .children
        .into_iter()
        .map(|child| {
            expect_kind(&child, ObjectKind::Job, &checked.path)?;
            decode_job(child, Some(&checked.path))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Partition::new(
        checked.into_header(ObjectKind::Partition),
        job_count,
        jobs,
    ))
}

fn decode_job(object: WireObject, parent: Option<&ObjectPath>) -> Result<Job> {
    let checked = check_header(&object, parent)?;
    if let Some(child) = object.children.first() {
        return Err(invalid(format!(
            "job `{}` cannot own children (found {} `{}`)",
            checked.path,
            child.detail.kind(),
            child.path
        )));
    }
    let WireDetail::Job { job_id, state } = object.detail else {
        return Err(invalid("expected a job"));
    };
    check_badge(&checked.path, &object.badge, Badge::None)?;

    let state = state
        .parse::<JobState>()
        .map_err(|err| invalid(format!("job `{}`: {err}", checked.path)))?;

    Ok(Job::new(checked.into_header(ObjectKind::Job), job_id, state))
}

fn expect_kind(
    child: &WireObject,
    expected: ObjectKind,
    parent: &ObjectPath,
) -> Result<()> {
    let actual = child.detail.kind();
    if actual != expected {
        return Err(invalid(format!(
            "`{parent}` may only own {} children, found {}",
            expected.as_str(),
            actual.as_str()
        )));
    }
    Ok(())
}
