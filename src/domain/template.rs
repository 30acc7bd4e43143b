//! Built-in mock operating system template.

use crate::domain::entities::{NodeKind, TemplateNode};

pub const ROOT_ID: &str = "os";

fn process(id: &str, name: &str, pid: u32, user: &str, state: &str) -> TemplateNode {
    TemplateNode::new(id, name, NodeKind::Process)
        .attr("pid", pid.to_string())
        .attr("user", user)
        .attr("state", state)
}

fn dir(id: &str, name: &str) -> TemplateNode {
    TemplateNode::new(id, name, NodeKind::Directory)
}

fn file(id: &str, name: &str, size: u64) -> TemplateNode {
    TemplateNode::new(id, name, NodeKind::File).attr("size", size.to_string())
}

fn user(id: &str, name: &str, uid: u32, shell: &str) -> TemplateNode {
    TemplateNode::new(id, name, NodeKind::User)
        .attr("uid", uid.to_string())
        .attr("shell", shell)
}

fn service(id: &str, name: &str, status: &str) -> TemplateNode {
    TemplateNode::new(id, name, NodeKind::Service).attr("status", status)
}

/// The fixed tree used by `rebuild`. Always returns the same structure.
pub fn os_template() -> TemplateNode {
    let processes = TemplateNode::new("processes", "Processes", NodeKind::Category)
        .child(
            process("proc-init", "init", 1, "root", "running")
                .child(
                    process("proc-sshd", "sshd", 412, "root", "sleeping")
                        .child(process("proc-bash", "bash", 1337, "alice", "running")),
                )
                .child(process("proc-cron", "cron", 388, "root", "sleeping")),
        )
        .child(process("proc-kthreadd", "kthreadd", 2, "root", "sleeping"));

    let filesystem = TemplateNode::new("filesystem", "File System", NodeKind::Category).child(
        dir("dir-root", "/")
            .child(
                dir("dir-etc", "etc")
                    .child(file("file-hosts", "hosts", 220))
                    .child(file("file-passwd", "passwd", 1843)),
            )
            .child(
                dir("dir-home", "home").child(
                    dir("dir-home-alice", "alice").child(file("file-notes", "notes.txt", 512)),
                ),
            )
            .child(
                dir("dir-var", "var")
                    .child(dir("dir-var-log", "log").child(file("file-syslog", "syslog", 48213))),
            ),
    );

    let network = TemplateNode::new("network", "Network", NodeKind::Category)
        .child(
            TemplateNode::new("net-lo", "lo", NodeKind::NetworkInterface)
                .attr("address", "127.0.0.1")
                .attr("mtu", "65536")
                .attr("state", "up"),
        )
        .child(
            TemplateNode::new("net-eth0", "eth0", NodeKind::NetworkInterface)
                .attr("address", "192.168.1.10")
                .attr("mac", "52:54:00:12:34:56")
                .attr("mtu", "1500")
                .attr("state", "up"),
        )
        .child(
            TemplateNode::new("net-wlan0", "wlan0", NodeKind::NetworkInterface)
                .attr("mtu", "1500")
                .attr("state", "down"),
        );

    let users = TemplateNode::new("users", "Users", NodeKind::Category)
        .child(user("user-root", "root", 0, "/bin/bash"))
        .child(user("user-alice", "alice", 1000, "/bin/zsh"))
        .child(user("user-nobody", "nobody", 65534, "/usr/sbin/nologin"));

    let services = TemplateNode::new("services", "Services", NodeKind::Category)
        .child(service("svc-sshd", "sshd", "active").attr("port", "22"))
        .child(service("svc-cron", "cron", "active"))
        .child(service("svc-nginx", "nginx", "inactive").attr("port", "80"));

    let devices = TemplateNode::new("devices", "Devices", NodeKind::Category)
        .child(
            TemplateNode::new("dev-sda", "sda", NodeKind::Device)
                .attr("type", "disk")
                .attr("size", "512G")
                .child(
                    TemplateNode::new("dev-sda1", "sda1", NodeKind::Device)
                        .attr("size", "1G")
                        .attr("mount", "/boot"),
                )
                .child(
                    TemplateNode::new("dev-sda2", "sda2", NodeKind::Device)
                        .attr("size", "511G")
                        .attr("mount", "/"),
                ),
        )
        .child(TemplateNode::new("dev-tty0", "tty0", NodeKind::Device).attr("type", "tty"));

    TemplateNode::new(ROOT_ID, "Operating System", NodeKind::Root)
        .expanded()
        .attr("hostname", "mockhost")
        .attr("kernel", "6.1.0-mock")
        .attr("arch", "x86_64")
        .child(processes)
        .child(filesystem)
        .child(network)
        .child(users)
        .child(services)
        .child(devices)
}
