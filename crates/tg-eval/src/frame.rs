use tg_match::Value;

/// One call frame's local storage: a generator's parameters and
/// declarations, or the top-level program's (which is its own frame,
/// holding `argv` at slot 0).
#[derive(Debug)]
pub struct Frame {
    values: Vec<Value>,
}

impl Frame {
    pub fn new(size: u32) -> Self {
        Self { values: vec![Value::Undefined; size as usize] }
    }

    pub fn get(&self, slot: u32) -> Value {
        self.values[slot as usize].clone()
    }

    pub fn set(&mut self, slot: u32, value: Value) {
        self.values[slot as usize] = value;
    }
}
