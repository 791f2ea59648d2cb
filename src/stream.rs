//! Per-stream state machine and flow-control integration.
//!
//! A [`Stream`] owns its lifecycle state, both flow-control windows and
//! a send buffer for DATA blocked on the remote window. It is fed
//! frames by the connection driver ([`Stream::receive`] for inbound,
//! [`Stream::send`] and the higher-level helpers for outbound) and
//! reports everything that happened through a queue of
//! [`StreamEvent`]s the driver drains. Outbound frames are themselves
//! events ([`StreamEvent::Frame`]) to be handed to the frame codec.

use std::collections::VecDeque;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::flow::FlowController;
use crate::frame::{flags, ErrorCode, Frame, FrameKind, Payload, Priority};
use crate::settings::Settings;

/// Default priority weight.
const DEFAULT_WEIGHT: u16 = 16;

/// Stream lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    ReservedLocal,
    ReservedRemote,
    Open,
    HalfClosedLocal,
    HalfClosedRemote,
    Closed,
}

/// Why a stream ended up closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosedReason {
    /// We sent RST_STREAM.
    LocalRst,
    /// The peer sent RST_STREAM.
    RemoteRst,
    /// We finished with END_STREAM while the peer was already done.
    LocalClosed,
    /// The peer finished with END_STREAM while we were already done.
    RemoteClosed,
}

/// Everything a stream reports back to its driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// The stream became active (entered open or a half-closed state)
    /// for the first time.
    Active,
    /// The stream was reserved by a push promise.
    Reserved,
    /// One direction finished.
    HalfClose,
    /// The stream closed; carries the error code when it did not end
    /// cleanly.
    Close(Option<ErrorCode>),
    /// An inbound header block fragment (HPACK decoding is the
    /// driver's job; the compression context is connection-scope).
    Headers(Bytes),
    /// Inbound DATA payload.
    Data(Bytes),
    /// Priority information changed.
    Priority {
        weight: u16,
        dependency: u32,
        exclusive: bool,
    },
    /// An outbound frame, ready for the frame codec.
    Frame(Frame),
    /// The remote (send-direction) window changed.
    Window(i64),
    /// The local (receive-direction) window changed.
    LocalWindow(i64),
}

/// One HTTP/2 stream.
#[derive(Debug)]
pub struct Stream {
    id: u32,
    state: State,
    closed_reason: Option<ClosedReason>,
    /// Parent stream for pushed streams.
    parent: Option<u32>,
    weight: u16,
    dependency: u32,
    exclusive: bool,
    /// Receive-direction window with update generation.
    local: FlowController,
    /// Send-direction budget granted by the peer.
    remote_window: i64,
    /// Peer's initial window, tracked for SETTINGS deltas.
    remote_initial_window: u32,
    /// Chunk bound for outgoing DATA.
    max_frame_size: usize,
    /// DATA frames blocked on the remote window.
    pending: VecDeque<Frame>,
    events: VecDeque<StreamEvent>,
    activated: bool,
}

impl Stream {
    /// Create an idle stream with default windows and frame size.
    pub fn new(id: u32) -> Self {
        Self::with_settings(id, &Settings::default(), &Settings::default())
    }

    /// Create an idle stream from the two directions' settings: ours
    /// for the receive window, the peer's for the send window and the
    /// DATA chunk size.
    pub fn with_settings(id: u32, local: &Settings, remote: &Settings) -> Self {
        Self {
            id,
            state: State::Idle,
            closed_reason: None,
            parent: None,
            weight: DEFAULT_WEIGHT,
            dependency: 0,
            exclusive: false,
            local: FlowController::new(local.initial_window_size),
            remote_window: remote.initial_window_size as i64,
            remote_initial_window: remote.initial_window_size,
            max_frame_size: remote.max_frame_size as usize,
            pending: VecDeque::new(),
            events: VecDeque::new(),
            activated: false,
        }
    }

    /// Create a stream reserved by a peer's push promise.
    pub fn promised(id: u32, parent: u32, local: &Settings, remote: &Settings) -> Self {
        let mut stream = Self::with_settings(id, local, remote);
        stream.parent = Some(parent);
        stream
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn closed_reason(&self) -> Option<ClosedReason> {
        self.closed_reason
    }

    pub fn parent(&self) -> Option<u32> {
        self.parent
    }

    pub fn weight(&self) -> u16 {
        self.weight
    }

    pub fn dependency(&self) -> u32 {
        self.dependency
    }

    pub fn exclusive(&self) -> bool {
        self.exclusive
    }

    pub fn remote_window(&self) -> i64 {
        self.remote_window
    }

    pub fn local_window(&self) -> i64 {
        self.local.current_window()
    }

    /// Bytes of DATA waiting for the remote window to open.
    pub fn buffered(&self) -> usize {
        self.pending
            .iter()
            .map(|f| match &f.payload {
                Payload::Data { data } => data.len(),
                _ => 0,
            })
            .sum()
    }

    /// Pop the next pending event.
    pub fn poll_event(&mut self) -> Option<StreamEvent> {
        self.events.pop_front()
    }

    /// Drain all pending events.
    pub fn take_events(&mut self) -> Vec<StreamEvent> {
        self.events.drain(..).collect()
    }

    // ------------------------------------------------------------------
    // Inbound
    // ------------------------------------------------------------------

    /// Apply a received frame to the stream state.
    ///
    /// Stream-level violations reset the stream (RST_STREAM is queued
    /// as a [`StreamEvent::Frame`]) and surface as [`Error::Stream`];
    /// connection-level violations surface as [`Error::Protocol`] and
    /// leave disposition to the driver.
    pub fn receive(&mut self, frame: &Frame) -> Result<()> {
        let kind = frame.kind();
        trace!(stream = self.id, state = ?self.state, ?kind, "receive");

        // PRIORITY is processed in every state, on either side of the
        // lifecycle.
        if let Payload::Priority(priority) = &frame.payload {
            self.update_priority(*priority);
            return Ok(());
        }

        match self.state {
            State::Idle => match kind {
                FrameKind::Headers => {
                    self.activate();
                    if let Payload::Headers { priority, fragment } = &frame.payload {
                        if let Some(priority) = priority {
                            self.update_priority(*priority);
                        }
                        self.events.push_back(StreamEvent::Headers(fragment.clone()));
                    }
                    if frame.end_stream() {
                        self.half_close_remote();
                    } else {
                        self.state = State::Open;
                    }
                    Ok(())
                }
                FrameKind::PushPromise => {
                    self.state = State::ReservedRemote;
                    self.events.push_back(StreamEvent::Reserved);
                    Ok(())
                }
                FrameKind::RstStream => {
                    self.close_remote_rst(frame);
                    Ok(())
                }
                _ => Err(Error::protocol(format!(
                    "{kind:?} received on idle stream {}",
                    self.id
                ))),
            },
            State::ReservedLocal => match kind {
                FrameKind::RstStream => {
                    self.close_remote_rst(frame);
                    Ok(())
                }
                FrameKind::WindowUpdate => self.receive_window_update(frame),
                _ => Err(Error::protocol(format!(
                    "{kind:?} received on reserved(local) stream {}",
                    self.id
                ))),
            },
            State::ReservedRemote => match kind {
                FrameKind::Headers => {
                    self.activate();
                    if let Payload::Headers { fragment, .. } = &frame.payload {
                        self.events.push_back(StreamEvent::Headers(fragment.clone()));
                    }
                    self.state = State::HalfClosedLocal;
                    self.events.push_back(StreamEvent::HalfClose);
                    Ok(())
                }
                FrameKind::RstStream => {
                    self.close_remote_rst(frame);
                    Ok(())
                }
                _ => Err(Error::protocol(format!(
                    "{kind:?} received on reserved(remote) stream {}",
                    self.id
                ))),
            },
            State::Open => {
                self.deliver(frame)?;
                if frame.end_stream() {
                    self.half_close_remote();
                }
                Ok(())
            }
            State::HalfClosedLocal => match kind {
                FrameKind::Data | FrameKind::Headers | FrameKind::Continuation => {
                    self.deliver(frame)?;
                    if frame.end_stream() {
                        self.enter_closed(ClosedReason::RemoteClosed, None);
                    }
                    Ok(())
                }
                FrameKind::WindowUpdate => self.receive_window_update(frame),
                FrameKind::RstStream => {
                    self.close_remote_rst(frame);
                    Ok(())
                }
                _ => Err(Error::protocol(format!(
                    "{kind:?} received on half-closed(local) stream {}",
                    self.id
                ))),
            },
            State::HalfClosedRemote => match kind {
                FrameKind::WindowUpdate => self.receive_window_update(frame),
                FrameKind::RstStream => {
                    self.close_remote_rst(frame);
                    Ok(())
                }
                // The peer already finished this direction.
                _ => self.stream_error(ErrorCode::StreamClosed),
            },
            State::Closed => self.receive_when_closed(frame),
        }
    }

    /// Closed-state receive policy depends on how the stream closed.
    fn receive_when_closed(&mut self, frame: &Frame) -> Result<()> {
        match self.closed_reason {
            // We reset or finished the stream; frames already in
            // flight from the peer are ignored, but DATA still counts
            // against the receive window so connection accounting
            // stays truthful.
            Some(ClosedReason::LocalRst) | Some(ClosedReason::LocalClosed) => {
                if let Payload::Data { data } = &frame.payload {
                    self.local.receive(data.len());
                    self.events
                        .push_back(StreamEvent::LocalWindow(self.local.current_window()));
                }
                debug!(stream = self.id, kind = ?frame.kind(), "ignoring frame on closed stream");
                Ok(())
            }
            // The peer knows the stream is dead: only RST_STREAM and
            // WINDOW_UPDATE stragglers are tolerated.
            _ => match frame.kind() {
                FrameKind::RstStream | FrameKind::WindowUpdate => Ok(()),
                _ => self.stream_error(ErrorCode::StreamClosed),
            },
        }
    }

    /// Deliver DATA/HEADERS/CONTINUATION payloads as events.
    fn deliver(&mut self, frame: &Frame) -> Result<()> {
        match &frame.payload {
            Payload::Data { data } => {
                // The window pays for the bytes before they are
                // delivered.
                self.local.receive(data.len());
                self.events
                    .push_back(StreamEvent::LocalWindow(self.local.current_window()));
                self.events.push_back(StreamEvent::Data(data.clone()));
            }
            Payload::Headers { priority, fragment } => {
                if let Some(priority) = priority {
                    self.update_priority(*priority);
                }
                self.events.push_back(StreamEvent::Headers(fragment.clone()));
            }
            Payload::Continuation { fragment } => {
                self.events.push_back(StreamEvent::Headers(fragment.clone()));
            }
            Payload::WindowUpdate(_) => return self.receive_window_update(frame),
            Payload::RstStream(_) => {
                self.close_remote_rst(frame);
            }
            _ => {}
        }
        Ok(())
    }

    fn receive_window_update(&mut self, frame: &Frame) -> Result<()> {
        if let Payload::WindowUpdate(increment) = &frame.payload {
            self.remote_window += *increment as i64;
            self.events
                .push_back(StreamEvent::Window(self.remote_window));
            self.pump();
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Outbound
    // ------------------------------------------------------------------

    /// Send a frame on this stream.
    ///
    /// DATA frames are subject to the remote window: what fits goes out
    /// as [`StreamEvent::Frame`], the rest is buffered until a
    /// WINDOW_UPDATE arrives. Illegal sends for the current state are
    /// programmer errors and surface as [`Error::Stream`] with
    /// INTERNAL_ERROR, without touching the stream.
    pub fn send(&mut self, frame: Frame) -> Result<()> {
        let kind = frame.kind();
        trace!(stream = self.id, state = ?self.state, ?kind, "send");

        match self.state {
            State::Idle => match kind {
                FrameKind::Headers => {
                    self.activate();
                    if frame.end_stream() {
                        self.state = State::HalfClosedLocal;
                        self.events.push_back(StreamEvent::HalfClose);
                    } else {
                        self.state = State::Open;
                    }
                    self.emit(frame);
                    Ok(())
                }
                FrameKind::PushPromise => {
                    self.state = State::ReservedLocal;
                    self.events.push_back(StreamEvent::Reserved);
                    self.emit(frame);
                    Ok(())
                }
                FrameKind::Priority => {
                    self.emit(frame);
                    Ok(())
                }
                FrameKind::RstStream => {
                    self.close_local_rst(frame);
                    Ok(())
                }
                _ => self.send_violation(kind),
            },
            State::ReservedLocal => match kind {
                FrameKind::Headers => {
                    self.activate();
                    self.state = State::HalfClosedRemote;
                    self.events.push_back(StreamEvent::HalfClose);
                    self.emit(frame);
                    Ok(())
                }
                FrameKind::RstStream => {
                    self.close_local_rst(frame);
                    Ok(())
                }
                FrameKind::Priority => {
                    self.emit(frame);
                    Ok(())
                }
                _ => self.send_violation(kind),
            },
            State::ReservedRemote => match kind {
                FrameKind::Priority | FrameKind::WindowUpdate => {
                    self.emit(frame);
                    Ok(())
                }
                FrameKind::RstStream => {
                    self.close_local_rst(frame);
                    Ok(())
                }
                _ => self.send_violation(kind),
            },
            State::Open => match kind {
                FrameKind::RstStream => {
                    self.close_local_rst(frame);
                    Ok(())
                }
                _ => {
                    let ends = frame.end_stream();
                    self.dispatch(frame);
                    if ends {
                        self.state = State::HalfClosedLocal;
                        self.events.push_back(StreamEvent::HalfClose);
                    }
                    Ok(())
                }
            },
            State::HalfClosedLocal => match kind {
                FrameKind::WindowUpdate | FrameKind::Priority => {
                    self.emit(frame);
                    Ok(())
                }
                FrameKind::RstStream => {
                    self.close_local_rst(frame);
                    Ok(())
                }
                _ => self.send_violation(kind),
            },
            State::HalfClosedRemote => match kind {
                FrameKind::Data | FrameKind::Headers | FrameKind::Continuation => {
                    let ends = frame.end_stream();
                    self.dispatch(frame);
                    if ends {
                        self.enter_closed(ClosedReason::LocalClosed, None);
                    }
                    Ok(())
                }
                FrameKind::Priority => {
                    self.emit(frame);
                    Ok(())
                }
                FrameKind::RstStream => {
                    self.close_local_rst(frame);
                    Ok(())
                }
                _ => self.send_violation(kind),
            },
            State::Closed => match kind {
                FrameKind::Priority => {
                    self.emit(frame);
                    Ok(())
                }
                // Late resets are dropped silently.
                FrameKind::RstStream => Ok(()),
                _ => self.send_violation(kind),
            },
        }
    }

    /// Send a header block fragment, splitting across HEADERS and
    /// CONTINUATION frames when it exceeds the frame payload limit.
    pub fn headers(
        &mut self,
        fragment: impl Into<Bytes>,
        end_headers: bool,
        end_stream: bool,
    ) -> Result<()> {
        let fragment: Bytes = fragment.into();
        if fragment.len() <= self.max_frame_size {
            return self.send(Frame::headers(self.id, fragment, end_headers, end_stream));
        }

        // The continuations belong to the block the HEADERS frame
        // opened, so they bypass the state table (END_STREAM has
        // already settled the transition).
        let mut rest = fragment;
        let head = rest.split_to(self.max_frame_size);
        self.send(Frame::headers(self.id, head, false, end_stream))?;
        while rest.len() > self.max_frame_size {
            let chunk = rest.split_to(self.max_frame_size);
            self.emit(Frame::continuation(self.id, chunk, false));
        }
        self.emit(Frame::continuation(self.id, rest, end_headers));
        Ok(())
    }

    /// Send a DATA payload, chunked to the peer's maximum frame size.
    /// Chunks beyond the remote window are buffered.
    pub fn data(&mut self, payload: impl Into<Bytes>, end_stream: bool) -> Result<()> {
        let mut rest: Bytes = payload.into();
        while rest.len() > self.max_frame_size {
            let chunk = rest.split_to(self.max_frame_size);
            self.send(Frame::data(self.id, chunk, false))?;
        }
        self.send(Frame::data(self.id, rest, end_stream))
    }

    /// Send and record a priority update.
    pub fn priority(&mut self, weight: u16, dependency: u32, exclusive: bool) -> Result<()> {
        let priority = Priority {
            exclusive,
            dependency,
            weight,
        };
        self.send(Frame::priority(self.id, priority))?;
        self.update_priority(priority);
        Ok(())
    }

    /// Close the stream: with an error code via RST_STREAM, or cleanly
    /// by finishing our direction with an empty END_STREAM DATA frame.
    pub fn close(&mut self, error: Option<ErrorCode>) -> Result<()> {
        match error {
            Some(code) => self.send(Frame::rst_stream(self.id, code)),
            None => match self.state {
                State::Open | State::HalfClosedRemote => {
                    self.data(Bytes::new(), true)
                }
                _ => self.send(Frame::rst_stream(self.id, ErrorCode::NoError)),
            },
        }
    }

    /// Reset the stream with CANCEL.
    pub fn cancel(&mut self) -> Result<()> {
        self.send(Frame::rst_stream(self.id, ErrorCode::Cancel))
    }

    /// Refuse a pushed stream with REFUSED_STREAM.
    pub fn refuse(&mut self) -> Result<()> {
        self.send(Frame::rst_stream(self.id, ErrorCode::RefusedStream))
    }

    /// Generate a WINDOW_UPDATE frame replenishing the local window,
    /// when one is due.
    pub fn create_window_update(&mut self) -> Option<Frame> {
        let increment = self.local.create_window_update()?;
        self.events
            .push_back(StreamEvent::LocalWindow(self.local.current_window()));
        Some(Frame::window_update(self.id, increment))
    }

    /// Fold in a peer SETTINGS change: the send window shifts by the
    /// initial-window delta and the DATA chunk size follows.
    pub fn apply_remote_settings(&mut self, remote: &Settings) {
        let delta = remote.initial_window_size as i64 - self.remote_initial_window as i64;
        if delta != 0 {
            self.remote_window += delta;
            self.remote_initial_window = remote.initial_window_size;
            self.events
                .push_back(StreamEvent::Window(self.remote_window));
            self.pump();
        }
        self.max_frame_size = remote.max_frame_size as usize;
    }

    /// Resize the local receive window (our SETTINGS change).
    pub fn update_local_window(&mut self, initial_window: u32) {
        self.local.resize(initial_window);
        self.events
            .push_back(StreamEvent::LocalWindow(self.local.current_window()));
    }

    /// Drain buffered DATA while the remote window allows, splitting
    /// the frame at the window boundary when it only partly fits.
    pub fn pump(&mut self) {
        while self.remote_window > 0 {
            let Some(frame) = self.pending.pop_front() else {
                break;
            };
            let Payload::Data { data } = &frame.payload else {
                self.emit(frame);
                continue;
            };

            if (data.len() as i64) <= self.remote_window {
                self.remote_window -= data.len() as i64;
                self.emit(frame);
            } else {
                let mut head = data.clone();
                let tail = head.split_off(self.remote_window as usize);
                // END_STREAM stays with the unsent tail.
                let sent = Frame {
                    stream: frame.stream,
                    flags: frame.flags & !flags::END_STREAM,
                    padding: 0,
                    payload: Payload::Data { data: head },
                };
                let rest = Frame {
                    payload: Payload::Data { data: tail },
                    ..frame
                };
                self.pending.push_front(rest);
                self.remote_window = 0;
                self.emit(sent);
            }
            self.events
                .push_back(StreamEvent::Window(self.remote_window));
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Route an outbound DATA frame through flow control; everything
    /// else goes straight out.
    fn dispatch(&mut self, frame: Frame) {
        if let Payload::Data { data } = &frame.payload {
            if !self.pending.is_empty() || (data.len() as i64) > self.remote_window {
                trace!(
                    stream = self.id,
                    buffered = data.len(),
                    window = self.remote_window,
                    "buffering DATA on exhausted window"
                );
                self.pending.push_back(frame);
                self.pump();
                return;
            }
            self.remote_window -= data.len() as i64;
            self.events
                .push_back(StreamEvent::Window(self.remote_window));
        }
        self.emit(frame);
    }

    fn emit(&mut self, frame: Frame) {
        self.events.push_back(StreamEvent::Frame(frame));
    }

    fn activate(&mut self) {
        if !self.activated {
            self.activated = true;
            self.events.push_back(StreamEvent::Active);
        }
    }

    fn update_priority(&mut self, priority: Priority) {
        self.weight = priority.weight;
        self.dependency = priority.dependency;
        self.exclusive = priority.exclusive;
        self.events.push_back(StreamEvent::Priority {
            weight: priority.weight,
            dependency: priority.dependency,
            exclusive: priority.exclusive,
        });
    }

    fn half_close_remote(&mut self) {
        self.state = State::HalfClosedRemote;
        self.events.push_back(StreamEvent::HalfClose);
    }

    fn enter_closed(&mut self, reason: ClosedReason, error: Option<ErrorCode>) {
        if self.state == State::Closed {
            return;
        }
        debug!(stream = self.id, ?reason, ?error, "stream closed");
        self.state = State::Closed;
        self.closed_reason = Some(reason);
        self.pending.clear();
        self.events.push_back(StreamEvent::Close(error));
    }

    fn close_remote_rst(&mut self, frame: &Frame) {
        let code = match &frame.payload {
            Payload::RstStream(code) => Some(*code),
            _ => None,
        };
        self.enter_closed(ClosedReason::RemoteRst, code);
    }

    fn close_local_rst(&mut self, frame: Frame) {
        let code = match &frame.payload {
            Payload::RstStream(code) => Some(*code),
            _ => None,
        };
        self.emit(frame);
        self.enter_closed(ClosedReason::LocalRst, code);
    }

    /// Stream-error policy for inbound violations: reset, close, tell
    /// the driver, and report.
    fn stream_error(&mut self, code: ErrorCode) -> Result<()> {
        let newly_closed = self.state != State::Closed;
        self.emit(Frame::rst_stream(self.id, code));
        if newly_closed {
            self.state = State::Closed;
            self.closed_reason = Some(ClosedReason::LocalRst);
            self.pending.clear();
            self.events.push_back(StreamEvent::Close(Some(code)));
        }
        Err(Error::stream(self.id, code))
    }

    /// Illegal sends are programmer errors; the stream is untouched.
    fn send_violation(&mut self, kind: FrameKind) -> Result<()> {
        debug!(stream = self.id, state = ?self.state, ?kind, "illegal send");
        Err(Error::stream(self.id, ErrorCode::InternalError))
    }
}
