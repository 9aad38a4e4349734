use memlru::memcache::cli::parser::RuntimeType;

pub struct MemlrudServerParamsBuilder {
    runtime: RuntimeType,
    port: u16,
    memory_limit: Option<String>,
}

impl MemlrudServerParamsBuilder {
    pub fn new() -> MemlrudServerParamsBuilder {
        MemlrudServerParamsBuilder {
            runtime: RuntimeType::MultiThread,
            port: 11211,
            memory_limit: None,
        }
    }

    pub fn with_runtime(&mut self, runtime: RuntimeType) -> &mut Self {
        self.runtime = runtime;
        self
    }

    pub fn with_port(&mut self, port: u16) -> &mut Self {
        self.port = port;
        self
    }

    pub fn with_memory_limit(&mut self, memory_limit: &str) -> &mut Self {
        self.memory_limit = Some(String::from(memory_limit));
        self
    }

    pub fn build(&self) -> Vec<String> {
        let mut result: Vec<String> = Vec::new();
        result.push(String::from("./target/debug/memlrud"));

        match self.runtime {
            RuntimeType::CurrentThread => {
                result.push(String::from("--runtime-type"));
                result.push(String::from("current-thread"));
            }
            RuntimeType::MultiThread => {
                result.push(String::from("--runtime-type"));
                result.push(String::from("multi-thread"));
            }
        }

        if let Some(memory_limit) = &self.memory_limit {
            result.push(String::from("--memory-limit"));
            result.push(memory_limit.clone());
        }

        result.push(String::from("--port"));
        result.push(self.port.to_string());
        result
    }
}
