use crate::core::config::data::Config;

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.default_model {
            Some(model) => println!("  default-model: {model}"),
            None => println!("  default-model: (unset)"),
        }
        match self.temperature() {
            Some(temperature) => println!("  temperature: {temperature}"),
            None => println!("  temperature: (unset)"),
        }
        match &self.theme {
            Some(theme) => println!("  theme: {theme}"),
            None => println!("  theme: (unset)"),
        }
        match &self.base_url {
            Some(url) => println!("  base-url: {url}"),
            None => println!("  base-url: (default)"),
        }
        println!("  request-timeout: {}s", self.request_timeout().as_secs());
        println!("  reveal-delay: {}ms", self.reveal_delay().as_millis());
    }
}
