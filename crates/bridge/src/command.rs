// Inbound command surface: raw calls, parsed commands and replies

use kinema_core::{Result, SourceDescriptor, VideoError};
use std::collections::HashMap;

/// Raw inbound command as decoded from the dispatch transport.
#[derive(Debug, Clone, Default)]
pub struct CommandCall {
    pub method: String,
    pub args: CommandArgs,
}

impl CommandCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            args: CommandArgs::default(),
        }
    }

    pub fn with_handle(mut self, handle: i64) -> Self {
        self.args.handle = Some(handle);
        self
    }

    pub fn with_asset(mut self, asset: impl Into<String>) -> Self {
        self.args.asset = Some(asset.into());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.args.uri = Some(uri.into());
        self
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.args.volume = Some(volume);
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.args.looping = Some(looping);
        self
    }

    pub fn with_position(mut self, position_ms: i64) -> Self {
        self.args.position_ms = Some(position_ms);
        self
    }
}

/// Argument bag for a raw call; fields a command does not use stay `None`.
#[derive(Debug, Clone, Default)]
pub struct CommandArgs {
    pub asset: Option<String>,
    pub package: Option<String>,
    pub uri: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    pub format_hint: Option<String>,
    pub handle: Option<i64>,
    pub looping: Option<bool>,
    pub volume: Option<f64>,
    pub position_ms: Option<i64>,
}

/// Fully-parsed command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Global reset: dispose every live instance
    Init,
    Create(SourceDescriptor),
    Control { handle: i64, op: ControlOp },
}

/// Per-instance operations routed through the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlOp {
    SetLooping(bool),
    SetVolume(f64),
    Play,
    Pause,
    SeekTo(i64),
    Position,
    Dispose,
}

/// Successful command payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandReply {
    None,
    Handle(i64),
    Position(u64),
}

impl Command {
    /// Parse a raw call into a typed command.
    pub fn parse(call: &CommandCall) -> Result<Command> {
        match call.method.as_str() {
            "init" => Ok(Command::Init),
            "create" => Ok(Command::Create(parse_source(&call.args)?)),
            method @ ("setLooping" | "setVolume" | "play" | "pause" | "seekTo" | "position"
            | "dispose") => {
                let handle = call.args.handle.ok_or_else(|| {
                    VideoError::InvalidArgument(format!("'{}' requires a handle", method))
                })?;
                let op = match method {
                    "setLooping" => ControlOp::SetLooping(require(call.args.looping, "looping")?),
                    "setVolume" => ControlOp::SetVolume(require(call.args.volume, "volume")?),
                    "play" => ControlOp::Play,
                    "pause" => ControlOp::Pause,
                    "seekTo" => ControlOp::SeekTo(require(call.args.position_ms, "position")?),
                    "position" => ControlOp::Position,
                    _ => ControlOp::Dispose,
                };
                Ok(Command::Control { handle, op })
            }
            other => Err(VideoError::Unimplemented(other.to_string())),
        }
    }
}

fn require<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| VideoError::InvalidArgument(format!("missing argument '{}'", name)))
}

fn parse_source(args: &CommandArgs) -> Result<SourceDescriptor> {
    let mut descriptor = if let Some(asset) = &args.asset {
        SourceDescriptor::asset(asset.clone(), args.package.clone())
    } else if let Some(uri) = &args.uri {
        SourceDescriptor::remote(uri.clone())
    } else {
        return Err(VideoError::InvalidArgument(
            "create requires an 'asset' or 'uri' argument".into(),
        ));
    };
    if let Some(headers) = &args.headers {
        descriptor.headers = headers.clone();
    }
    descriptor.format_hint = args.format_hint.clone();
    Ok(descriptor)
}
