/// Connection state of a realtime session.
///
/// `Connecting` covers both the first attempt and every automatic
/// reconnection attempt after a drop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}
