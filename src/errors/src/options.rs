// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// The environment variable that enables expanded error rendering for
/// all adapters that do not explicitly opt out.
pub const DETAIL_VAR: &str = "GOOGLE_ENABLE_ERROR_DETAIL";

/// Returns true if the environment enables expanded error rendering.
///
/// Only the literal value `"true"` enables expansion. The variable is
/// process-wide state; [crate::GcpError::wrap] reads it once at
/// construction rather than on every rendering call.
pub fn detail_enabled() -> bool {
    std::env::var(DETAIL_VAR)
        .map(|v| v == "true")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoped_env::ScopedEnv;

    // This test must run serially because it manipulates the environment.
    #[test]
    #[serial_test::serial]
    fn detail_toggle() {
        let _e = ScopedEnv::remove(DETAIL_VAR);
        assert!(!detail_enabled(), "expected details to be disabled");

        let _e = ScopedEnv::set(DETAIL_VAR, "true");
        assert!(detail_enabled(), "expected details to be enabled");

        let _e = ScopedEnv::set(DETAIL_VAR, "not-true");
        assert!(!detail_enabled(), "expected details to be disabled");
    }
}
