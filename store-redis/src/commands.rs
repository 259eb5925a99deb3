use cache_adapter::ports::{Ack, BatchOp};
use redis::{Cmd, Pipeline, Value};

/// SET for a plain write, SETEX for an expiring one.
///
/// SETEX refuses a zero expiry, so zero is sent as `SET .. PX 1`.
pub fn set_command(key: &str, value: &[u8], ttl_secs: Option<u64>) -> Cmd {
    match ttl_secs {
        None => {
            let mut cmd = redis::cmd("SET");
            cmd.arg(key).arg(value);
            cmd
        }
        Some(0) => {
            let mut cmd = redis::cmd("SET");
            cmd.arg(key).arg(value).arg("PX").arg(1);
            cmd
        }
        Some(secs) => {
            let mut cmd = redis::cmd("SETEX");
            cmd.arg(key).arg(secs).arg(value);
            cmd
        }
    }
}

/// MULTI/EXEC pipeline carrying every queued op in order.
pub fn batch_pipeline(ops: &[BatchOp]) -> Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic();

    for op in ops {
        match op {
            BatchOp::Set {
                key,
                value,
                ttl_secs,
            } => {
                pipe.add_command(set_command(key, value, *ttl_secs));
            }
            BatchOp::Delete { key } => {
                pipe.cmd("DEL").arg(key);
            }
        }
    }

    pipe
}

/// Read a status reply as an acknowledgment.
pub fn ack_from_reply(reply: &Value) -> Ack {
    match reply {
        Value::Okay => Ack::Ok,
        Value::SimpleString(status) => Ack::from_status(status),
        other => Ack::Other(format!("{:?}", other)),
    }
}

/// True when EXEC returned one successful reply per queued op.
pub fn batch_succeeded(ops: &[BatchOp], replies: &[Value]) -> bool {
    ops.len() == replies.len()
        && ops.iter().zip(replies).all(|(op, reply)| match op {
            BatchOp::Set { .. } => ack_from_reply(reply).acknowledged(),
            BatchOp::Delete { .. } => matches!(reply, Value::Int(_)),
        })
}
