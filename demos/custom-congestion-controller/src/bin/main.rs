// SPDX-License-Identifier: Apache-2.0

use custom_congestion_controller::simulated_host::run_demo_session;

fn main() {
    let (lark, tcb) = run_demo_session();
    eprintln!(
        "final: cwnd={} ssthresh={} alpha={:.3}",
        tcb.cwnd(),
        tcb.ssthresh(),
        lark.alpha()
    );
}
