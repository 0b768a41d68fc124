#![no_main]

use blackjack_protocol::core::codec::FrameReassembler;
use blackjack_protocol::{ClientDecision, Offer, Request, ServerUpdate, WireMessage};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Every decoder must reject or accept, never panic
    let _ = Offer::from_bytes(data);
    let _ = Request::from_bytes(data);
    let _ = ClientDecision::from_bytes(data);
    let _ = ServerUpdate::from_bytes(data);

    // Split the input at its first byte and push both halves through reassembly
    let cut = data.first().map_or(0, |b| *b as usize).min(data.len());
    let mut reassembler = FrameReassembler::for_message::<ClientDecision>();
    for chunk in [&data[..cut], &data[cut..]] {
        for frame in reassembler.push(chunk) {
            let _ = ClientDecision::from_bytes(&frame);
        }
    }
});
