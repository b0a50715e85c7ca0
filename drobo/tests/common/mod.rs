//! In-process fake device for channel tests

#![allow(dead_code)]

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use drobo::{ClientConfig, Command, Frame};

pub const ESA_ID: &str = "0db1034a1b2c";

/// Frame received by the fake device: command id and raw payload (terminator included)
pub type Received = (u32, Vec<u8>);

pub async fn bind() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

pub fn config_for(status_port: u16, command_port: u16) -> ClientConfig {
    ClientConfig::new("127.0.0.1")
        .with_status_port(status_port)
        .with_command_port(command_port)
        .with_timeout(std::time::Duration::from_secs(5))
}

pub fn status_xml(esa_id: &str, slots: usize) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<ESATMUpdate>\n");
    xml.push_str("  <mStatus>32768</mStatus>\n");
    xml.push_str(&format!("  <mESAID>{esa_id}</mESAID>\n"));
    xml.push_str("  <mDiskPackStatus>0</mDiskPackStatus>\n");
    xml.push_str("  <mModel>Drobo 5N</mModel>\n");
    xml.push_str("  <mDroboName>storage</mDroboName>\n");
    xml.push_str("  <mVersion>4.1.2 [8.45.94128]</mVersion>\n");
    xml.push_str("  <mTotalCapacityProtected>5991257931776</mTotalCapacityProtected>\n");
    xml.push_str("  <mUsedCapacityProtected>2204152713216</mUsedCapacityProtected>\n");
    xml.push_str(&format!("  <mSlotCountExp>{slots}</mSlotCountExp>\n"));
    xml.push_str("  <mSlotsExp>\n");
    for i in 0..slots {
        let (status, capacity) = if i == slots - 1 { (128, 0) } else { (3, 3000592982016u64) };
        xml.push_str(&format!(
            "    <n{i}><mStatus>{status}</mStatus><mErrorCount>{i}</mErrorCount>\
             <mDiskType>0</mDiskType><mMake>WDC</mMake><mDiskFwRev>82.00A82</mDiskFwRev>\
             <mSerial>WD-WMC{i:04}</mSerial><mPhysicalCapacity>{capacity}</mPhysicalCapacity></n{i}>\n"
        ));
    }
    xml.push_str("  </mSlotsExp>\n");
    xml.push_str("  <DroboApps><DNASDroboAppsEnabled>1</DNASDroboAppsEnabled></DroboApps>\n");
    xml.push_str("</ESATMUpdate>\n");
    xml
}

/// 16-byte prefix followed by the NUL-terminated block
pub fn status_push(xml: &str) -> Vec<u8> {
    let block_len = xml.len() as i32 + 1;
    let mut out = vec![0u8; 12];
    out.extend_from_slice(&block_len.to_be_bytes());
    out.extend_from_slice(xml.as_bytes());
    out.push(0);
    out
}

pub fn frame(command_id: u32, payload: &[u8]) -> Vec<u8> {
    Frame {
        command_id,
        payload: bytes::Bytes::copy_from_slice(payload),
    }
    .encode()
    .to_vec()
}

pub fn handshake_ack() -> Vec<u8> {
    frame(Command::HandshakeAck.into(), b"")
}

pub fn response(xml: &str) -> Vec<u8> {
    frame(Command::Response.into(), xml.as_bytes())
}

pub async fn read_frame(socket: &mut TcpStream) -> Received {
    let mut header = [0u8; 16];
    socket.read_exact(&mut header).await.unwrap();
    assert_eq!(&header[..8], b"DRINETTM");

    let command_id = u32::from_be_bytes([header[8], header[9], header[10], header[11]]);
    let payload_len = u32::from_be_bytes([header[12], header[13], header[14], header[15]]);

    let mut payload = vec![0u8; payload_len as usize];
    socket.read_exact(&mut payload).await.unwrap();
    (command_id, payload)
}

/// Push `bytes` on accept, then hold the socket until the client closes it
pub fn spawn_status_device(listener: TcpListener, bytes: Vec<u8>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(&bytes).await.unwrap();
        let mut sink = Vec::new();
        let _ = socket.read_to_end(&mut sink).await;
    })
}

/// Push `bytes` on accept and close immediately
pub fn spawn_truncating_device(listener: TcpListener, bytes: Vec<u8>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(&bytes).await.unwrap();
    })
}

/// Answer each received frame with the next scripted reply, then wait for
/// the client to close. Returns every frame received.
pub fn spawn_command_device(
    listener: TcpListener,
    replies: Vec<Vec<u8>>,
) -> JoinHandle<Vec<Received>> {
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();

        for reply in replies {
            received.push(read_frame(&mut socket).await);
            socket.write_all(&reply).await.unwrap();
        }

        let mut sink = Vec::new();
        let _ = socket.read_to_end(&mut sink).await;
        received
    })
}

pub fn network_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<TMCmd>
  <CmdID>30</CmdID>
  <ResultCode>0</ResultCode>
  <ResultDetails>
    <DRINASConfig>
      <DRINasNetworkConfig>
        <NasName>storage</NasName>
        <NasWorkgroup>WORKGROUP</NasWorkgroup>
        <MACAddress>00:50:43:00:12:34</MACAddress>
        <PortSpeed>1000</PortSpeed>
        <PortDuplex>Full</PortDuplex>
        <IPConfig>
          <IPConfigType>1</IPConfigType>
          <IP>192.168.1.50</IP>
          <Subnet>255.255.255.0</Subnet>
          <Gateway>192.168.1.1</Gateway>
          <DNS1>192.168.1.1</DNS1>
          <DNS2>8.8.8.8</DNS2>
        </IPConfig>
        <JumboFramesConfig>
          <Enabled>0</Enabled>
          <MTUSize>1500</MTUSize>
        </JumboFramesConfig>
      </DRINasNetworkConfig>
    </DRINASConfig>
  </ResultDetails>
</TMCmd>
"#
}

pub fn shares_xml() -> &'static str {
    r#"<TMCmd><CmdID>30</CmdID><ResultDetails><DRINASConfig><DRIShareConfig><Shares>
<Share><ShareName>Public</ShareName><TimeMachineEnabled>0</TimeMachineEnabled></Share>
<Share><ShareName>Backups</ShareName><TimeMachineEnabled>1</TimeMachineEnabled></Share>
</Shares></DRIShareConfig></DRINASConfig></ResultDetails></TMCmd>"#
}
